use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{
    models::{FeatureCollection, Property},
    ports::{inbound::PropertyQueryService, outbound::PropertyStore},
    query::{
        merge_suggestions, BoundingBox, Field, GeoJsonFilters, IdentifierMatch, LimitPolicy,
        ListFilters, LongitudeScaling, NearbyOutcome, Ordering, Page, Predicate, PropertyDetail,
        PropertyStats, ScanRequest, SearchOutcome, SearchScope, Suggestion, SuggestionSource,
    },
    QueryError,
};

/// Number of community areas reported by [`PropertyQueryService::stats`].
const TOP_COMMUNITY_AREAS: usize = 10;

/// Tunables for the query engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub search_limit: LimitPolicy,
    pub identifier_match: IdentifierMatch,
    pub autocomplete_limit: LimitPolicy,
    /// Shorter prefixes yield no suggestions.
    pub min_prefix_length: usize,
    pub nearby_limit: LimitPolicy,
    pub default_radius_km: f64,
    pub longitude_scaling: LongitudeScaling,
    pub geojson_limit: LimitPolicy,
    pub page_size: LimitPolicy,
    /// Radius used for `nearby_properties_count` on the detail view.
    pub detail_radius_km: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search_limit: LimitPolicy::new(50, 100),
            identifier_match: IdentifierMatch::Prefix,
            autocomplete_limit: LimitPolicy::new(10, 20),
            min_prefix_length: 2,
            nearby_limit: LimitPolicy::new(25, 100),
            default_radius_km: 1.0,
            longitude_scaling: LongitudeScaling::Cosine,
            geojson_limit: LimitPolicy::new(500, 1000),
            page_size: LimitPolicy::new(25, 100),
            detail_radius_km: 1.0,
        }
    }
}

/// Implementation of the PropertyQueryService inbound port.
///
/// Turns each use case into a predicate plus a bounded scan and count
/// against the PropertyStore outbound port.
pub struct PropertyQueryServiceImpl<S: PropertyStore> {
    store: Arc<S>,
    config: QueryConfig,
}

impl<S: PropertyStore> PropertyQueryServiceImpl<S> {
    pub fn new(store: Arc<S>, config: QueryConfig) -> Self {
        Self { store, config }
    }

    async fn require(&self, pin: &str) -> Result<Property, QueryError> {
        self.store
            .find_by_pin(pin)
            .await?
            .ok_or_else(|| QueryError::not_found(format!("Property with PIN {} not found", pin)))
    }

    async fn within_box(
        &self,
        predicate: Predicate,
        center: [f64; 2],
        radius_km: f64,
        limit: usize,
    ) -> Result<NearbyOutcome, QueryError> {
        let total_count = self.store.count(&predicate).await?;
        let properties = self
            .store
            .scan(&predicate, ScanRequest::first(limit))
            .await?;

        Ok(NearbyOutcome {
            center,
            radius_km,
            total_count,
            properties,
        })
    }

    fn radius(&self, radius_km: Option<f64>) -> f64 {
        radius_km.unwrap_or(self.config.default_radius_km)
    }
}

/// Matches everything inside `bbox` except the record with `pin`.
fn around_excluding(bbox: &BoundingBox, pin: &str) -> Predicate {
    bbox.to_predicate()
        .and(Predicate::equals(Field::Pin, pin).negate())
}

#[async_trait]
impl<S: PropertyStore> PropertyQueryService for PropertyQueryServiceImpl<S> {
    async fn list_properties(
        &self,
        filters: &ListFilters,
        ordering: Ordering,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Property>, QueryError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(QueryError::invalid("page must be a positive integer"));
        }
        let page = usize::try_from(page).unwrap_or(usize::MAX);
        let page_size = self.config.page_size.resolve(page_size).max(1);

        let predicate = filters.to_predicate();
        let total_count = self.store.count(&predicate).await?;
        let total_pages = (total_count as usize).div_ceil(page_size).max(1);
        if page > total_pages {
            return Err(QueryError::not_found(format!("Invalid page {}", page)));
        }

        let request = ScanRequest {
            ordering,
            offset: (page - 1) * page_size,
            limit: page_size,
        };
        let items = self.store.scan(&predicate, request).await?;

        Ok(Page {
            items,
            page,
            page_size,
            total_count,
            total_pages,
        })
    }

    async fn get_property(&self, pin: &str) -> Result<PropertyDetail, QueryError> {
        let property = self.require(pin).await?;

        let bbox = match (property.latitude, property.longitude) {
            (Some(lat), Some(lon)) => BoundingBox::around(
                lat,
                lon,
                self.config.detail_radius_km,
                self.config.longitude_scaling,
            )
            .map_err(|e| tracing::debug!("No neighbourhood for {}: {}", pin, e))
            .ok(),
            _ => None,
        };

        let nearby_properties_count = match bbox {
            Some(bbox) => self.store.count(&around_excluding(&bbox, &property.pin)).await?,
            None => 0,
        };

        Ok(PropertyDetail {
            property,
            nearby_properties_count,
        })
    }

    async fn find_property(&self, pin: &str) -> Result<Property, QueryError> {
        self.require(pin).await
    }

    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        limit: Option<i64>,
    ) -> Result<SearchOutcome, QueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QueryError::invalid("Search query is required"));
        }
        let limit = self.config.search_limit.resolve(limit);

        let predicate = scope.predicate(query, self.config.identifier_match);
        let total_count = self.store.count(&predicate).await?;
        let properties = self
            .store
            .scan(&predicate, ScanRequest::first(limit))
            .await?;

        tracing::debug!(
            "Search '{}' in {} matched {} properties",
            query,
            scope,
            total_count
        );

        Ok(SearchOutcome {
            query: query.to_string(),
            scope,
            total_count,
            properties,
        })
    }

    async fn autocomplete(
        &self,
        prefix: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Suggestion>, QueryError> {
        let prefix = prefix.trim();
        if prefix.chars().count() < self.config.min_prefix_length {
            return Ok(vec![]);
        }
        let limit = self.config.autocomplete_limit.resolve(limit);

        let mut batches = Vec::with_capacity(SuggestionSource::PRECEDENCE.len());
        for source in SuggestionSource::PRECEDENCE {
            let values = self
                .store
                .distinct_values(source.field(), &source.predicate(prefix), source.cap(limit))
                .await?;
            batches.push((source, values));
        }

        Ok(merge_suggestions(batches, limit))
    }

    async fn nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
        limit: Option<i64>,
    ) -> Result<NearbyOutcome, QueryError> {
        let radius_km = self.radius(radius_km);
        let bbox = BoundingBox::around(lat, lon, radius_km, self.config.longitude_scaling)?;
        let limit = self.config.nearby_limit.resolve(limit);

        self.within_box(bbox.to_predicate(), [lon, lat], radius_km, limit)
            .await
    }

    async fn nearby_property(
        &self,
        pin: &str,
        radius_km: Option<f64>,
        limit: Option<i64>,
    ) -> Result<NearbyOutcome, QueryError> {
        let property = self.require(pin).await?;
        let [lon, lat] = property
            .coordinates()
            .ok_or_else(|| QueryError::invalid("Property has no coordinates"))?;

        let radius_km = self.radius(radius_km);
        let bbox = BoundingBox::around(lat, lon, radius_km, self.config.longitude_scaling)?;
        let limit = self.config.nearby_limit.resolve(limit);

        self.within_box(
            around_excluding(&bbox, &property.pin),
            [lon, lat],
            radius_km,
            limit,
        )
        .await
    }

    async fn geojson(
        &self,
        filters: &GeoJsonFilters,
        limit: Option<i64>,
    ) -> Result<FeatureCollection, QueryError> {
        let limit = self.config.geojson_limit.resolve(limit);
        let properties = self
            .store
            .scan(&filters.to_predicate(), ScanRequest::first(limit))
            .await?;

        let collection = FeatureCollection::from_properties(&properties);
        tracing::debug!(
            "GeoJSON: {} of {} scanned records mapped",
            collection.len(),
            properties.len()
        );
        Ok(collection)
    }

    async fn stats(&self) -> Result<PropertyStats, QueryError> {
        Ok(PropertyStats {
            total_properties: self.store.count(&Predicate::All).await?,
            community_areas: self.store.count_distinct(Field::CommunityArea).await?,
            zip_codes: self.store.count_distinct(Field::ZipCode).await?,
            wards: self.store.count_distinct(Field::Ward).await?,
            property_classes: self.store.count_distinct(Field::ClassCode).await?,
            top_community_areas: self
                .store
                .top_values(Field::CommunityArea, TOP_COMMUNITY_AREAS)
                .await?,
        })
    }
}
