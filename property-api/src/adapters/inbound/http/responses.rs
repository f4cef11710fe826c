//! HTTP response types for property endpoints.
//!
//! Each view selects a fixed subset of the record. Derived fields
//! (`coordinates`, `address_display`) are computed here.

use serde::Serialize;

use crate::domain::{
    models::{EnvironmentalInfo, Property, SchoolDistricts, TaxDistricts},
    query::{NearbyOutcome, Page, PropertyDetail, PropertyStats, SearchOutcome, Suggestion},
};

/// Lightweight view used by listings and search results.
#[derive(Debug, Serialize)]
pub struct PropertySummaryResponse {
    pub pin: String,
    pub pin10: String,
    pub coordinates: Option<[f64; 2]>,
    pub address_display: String,
    pub community_area_name: Option<String>,
    pub zip_code: Option<String>,
    pub ward_num: Option<i32>,
    pub township_name: Option<String>,
    pub class_code: Option<String>,
    pub address: Option<String>,
    pub year: Option<i32>,
    pub tax_code: Option<String>,
}

impl From<Property> for PropertySummaryResponse {
    fn from(property: Property) -> Self {
        Self {
            coordinates: property.coordinates(),
            address_display: property.address_display(),
            pin: property.pin,
            pin10: property.pin10,
            community_area_name: property.community_area_name,
            zip_code: property.zip_code,
            ward_num: property.ward_num,
            township_name: property.township_name,
            class_code: property.class_code,
            address: property.address,
            year: property.year,
            tax_code: property.tax_code,
        }
    }
}

/// Every stored field plus derived ones.
#[derive(Debug, Serialize)]
pub struct PropertyDetailResponse {
    #[serde(flatten)]
    pub property: Property,
    pub coordinates: Option<[f64; 2]>,
    pub address_display: String,
    pub nearby_properties_count: u64,
}

impl From<PropertyDetail> for PropertyDetailResponse {
    fn from(detail: PropertyDetail) -> Self {
        Self {
            coordinates: detail.property.coordinates(),
            address_display: detail.property.address_display(),
            property: detail.property,
            nearby_properties_count: detail.nearby_properties_count,
        }
    }
}

/// Minimal view for proximity results.
#[derive(Debug, Serialize)]
pub struct PropertyLocationResponse {
    pub pin: String,
    pub coordinates: Option<[f64; 2]>,
    pub community_area_name: Option<String>,
    pub zip_code: Option<String>,
    pub address_display: String,
}

impl From<Property> for PropertyLocationResponse {
    fn from(property: Property) -> Self {
        Self {
            coordinates: property.coordinates(),
            address_display: property.address_display(),
            pin: property.pin,
            community_area_name: property.community_area_name,
            zip_code: property.zip_code,
        }
    }
}

/// Identity header shared by the attribute-group views, with the group
/// flattened alongside it.
#[derive(Debug, Serialize)]
pub struct PropertyAttributesResponse<T: Serialize> {
    pub pin: String,
    pub coordinates: Option<[f64; 2]>,
    pub address_display: String,
    #[serde(flatten)]
    pub attributes: T,
}

pub type SchoolInfoResponse = PropertyAttributesResponse<SchoolDistricts>;
pub type TaxInfoResponse = PropertyAttributesResponse<TaxDistricts>;
pub type EnvironmentalInfoResponse = PropertyAttributesResponse<EnvironmentalInfo>;

impl<T: Serialize> PropertyAttributesResponse<T> {
    pub fn new(property: &Property, attributes: T) -> Self {
        Self {
            pin: property.pin.clone(),
            coordinates: property.coordinates(),
            address_display: property.address_display(),
            attributes,
        }
    }
}

impl From<Property> for SchoolInfoResponse {
    fn from(property: Property) -> Self {
        let schools = property.schools.clone();
        Self::new(&property, schools)
    }
}

impl From<Property> for TaxInfoResponse {
    fn from(property: Property) -> Self {
        let tax = property.tax.clone();
        Self::new(&property, tax)
    }
}

impl From<Property> for EnvironmentalInfoResponse {
    fn from(property: Property) -> Self {
        let environment = property.environment.clone();
        Self::new(&property, environment)
    }
}

#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub count: u64,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub results: Vec<T>,
}

impl<T> From<Page<Property>> for PageResponse<T>
where
    T: From<Property>,
{
    fn from(page: Page<Property>) -> Self {
        let page = page.map(T::from);
        Self {
            count: page.total_count,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            results: page.items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Matches before the limit was applied
    pub count: u64,
    pub results: Vec<PropertySummaryResponse>,
    pub query: String,
    pub search_type: String,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            count: outcome.total_count,
            results: outcome.properties.into_iter().map(Into::into).collect(),
            query: outcome.query,
            search_type: outcome.scope.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub count: u64,
    /// `[longitude, latitude]`
    pub center: [f64; 2],
    pub radius_km: f64,
    pub results: Vec<PropertyLocationResponse>,
}

impl From<NearbyOutcome> for NearbyResponse {
    fn from(outcome: NearbyOutcome) -> Self {
        Self {
            count: outcome.total_count,
            center: outcome.center,
            radius_km: outcome.radius_km,
            results: outcome.properties.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommunityAreaCountResponse {
    pub community_area: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_properties: u64,
    pub community_areas: u64,
    pub zip_codes: u64,
    pub wards: u64,
    pub property_classes: u64,
    pub top_community_areas: Vec<CommunityAreaCountResponse>,
}

impl From<PropertyStats> for StatsResponse {
    fn from(stats: PropertyStats) -> Self {
        Self {
            total_properties: stats.total_properties,
            community_areas: stats.community_areas,
            zip_codes: stats.zip_codes,
            wards: stats.wards,
            property_classes: stats.property_classes,
            top_community_areas: stats
                .top_community_areas
                .into_iter()
                .map(|top| CommunityAreaCountResponse {
                    community_area: top.value,
                    count: top.count,
                })
                .collect(),
        }
    }
}
