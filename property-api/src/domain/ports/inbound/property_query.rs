use async_trait::async_trait;

use crate::domain::{
    models::{FeatureCollection, Property},
    query::{
        GeoJsonFilters, ListFilters, NearbyOutcome, Ordering, Page, PropertyDetail,
        PropertyStats, SearchOutcome, SearchScope, Suggestion,
    },
    QueryError,
};

/// Inbound port for property lookups.
///
/// This trait defines the use cases that HTTP handlers can invoke. Limits are
/// passed through as requested and clamped by the implementation.
#[async_trait]
pub trait PropertyQueryService: Send + Sync + 'static {
    /// Paginated listing with exact-match filters.
    async fn list_properties(
        &self,
        filters: &ListFilters,
        ordering: Ordering,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Property>, QueryError>;

    /// A single record plus the count of its neighbours.
    async fn get_property(&self, pin: &str) -> Result<PropertyDetail, QueryError>;

    /// A single record, `NotFound` if the PIN is unknown.
    async fn find_property(&self, pin: &str) -> Result<Property, QueryError>;

    /// Free-text search over the fields selected by `scope`.
    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        limit: Option<i64>,
    ) -> Result<SearchOutcome, QueryError>;

    /// Suggestions for a partially typed query.
    async fn autocomplete(
        &self,
        prefix: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Suggestion>, QueryError>;

    /// Records inside a bounding box around a point.
    async fn nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
        limit: Option<i64>,
    ) -> Result<NearbyOutcome, QueryError>;

    /// Records around a stored property, excluding the property itself.
    async fn nearby_property(
        &self,
        pin: &str,
        radius_km: Option<f64>,
        limit: Option<i64>,
    ) -> Result<NearbyOutcome, QueryError>;

    /// Mappable records as GeoJSON point features.
    async fn geojson(
        &self,
        filters: &GeoJsonFilters,
        limit: Option<i64>,
    ) -> Result<FeatureCollection, QueryError>;

    /// Dataset-wide counts.
    async fn stats(&self) -> Result<PropertyStats, QueryError>;
}
