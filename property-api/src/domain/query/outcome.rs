use serde::Serialize;

use super::scope::SearchScope;
use crate::domain::models::Property;

/// Result of a free-text search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub query: String,
    pub scope: SearchScope,
    /// Matches before the limit was applied.
    pub total_count: u64,
    pub properties: Vec<Property>,
}

/// Result of a proximity search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyOutcome {
    /// `[longitude, latitude]`
    pub center: [f64; 2],
    pub radius_km: f64,
    /// Records inside the bounding box before the limit was applied.
    pub total_count: u64,
    pub properties: Vec<Property>,
}

/// One page of an ordered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
    pub total_count: u64,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDetail {
    pub property: Property,
    /// Other records in a 1 km box around this one.
    pub nearby_properties_count: u64,
}

/// A field value and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ValueCount {
    pub value: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyStats {
    pub total_properties: u64,
    pub community_areas: u64,
    pub zip_codes: u64,
    pub wards: u64,
    pub property_classes: u64,
    pub top_community_areas: Vec<ValueCount>,
}
