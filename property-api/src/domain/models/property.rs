use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use super::pin::derive_pin10;

/// A parcel record from the property-assessment dataset.
///
/// One canonical schema covers every source layout; everything except `pin`
/// is optional. Loaders map their source columns onto this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Property {
    /// Property Identification Number, unique across the store.
    pub pin: String,
    /// First ten digits of `pin`. Always re-derived, see [`Property::normalized`].
    #[serde(default)]
    pub pin10: String,
    /// Tax year
    pub year: Option<i32>,
    pub class_code: Option<String>,
    pub address: Option<String>,
    pub business: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub zip_code: Option<String>,
    pub triad_name: Option<String>,
    pub township_name: Option<String>,
    /// Neighborhood code
    pub nbhd_code: Option<String>,
    pub tax_code: Option<String>,
    /// Chicago ward number
    pub ward_num: Option<i32>,
    pub community_area_num: Option<i32>,
    pub community_area_name: Option<String>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub schools: SchoolDistricts,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub tax: TaxDistricts,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub environment: EnvironmentalInfo,
    /// When the ingestion run last wrote this record.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// School district assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SchoolDistricts {
    pub school_elementary_district_name: Option<String>,
    pub school_secondary_district_name: Option<String>,
    pub school_unified_district_name: Option<String>,
    pub school_school_year: Option<String>,
    pub school_data_year: Option<i32>,
}

/// Taxing district assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TaxDistricts {
    pub tax_municipality_name: Option<String>,
    pub tax_school_elementary_district_name: Option<String>,
    pub tax_school_secondary_district_name: Option<String>,
    pub tax_community_college_district_name: Option<String>,
    pub tax_fire_protection_district_name: Option<String>,
    pub tax_library_district_name: Option<String>,
    pub tax_park_district_name: Option<String>,
    pub tax_tif_district_name: Option<String>,
    pub tax_data_year: Option<i32>,
}

/// Flood, noise and economic-zone attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EnvironmentalInfo {
    /// FEMA Special Flood Hazard Area
    pub env_flood_fema_sfha: Option<bool>,
    pub env_flood_fs_factor: Option<f64>,
    pub env_flood_fs_risk_direction: Option<String>,
    pub env_ohare_noise_contour_no_buffer_bool: Option<bool>,
    pub env_ohare_noise_contour_half_mile_buffer_bool: Option<bool>,
    /// Airport noise level in DNL
    pub env_airport_noise_dnl: Option<f64>,
    pub econ_enterprise_zone_num: Option<String>,
    pub econ_qualified_opportunity_zone_num: Option<String>,
}

impl Property {
    /// Create a property with only its identifiers set.
    #[cfg(test)]
    pub fn new(pin: impl Into<String>) -> Self {
        let pin = pin.into();
        Self {
            pin10: derive_pin10(&pin),
            pin,
            year: None,
            class_code: None,
            address: None,
            business: None,
            latitude: None,
            longitude: None,
            zip_code: None,
            triad_name: None,
            township_name: None,
            nbhd_code: None,
            tax_code: None,
            ward_num: None,
            community_area_num: None,
            community_area_name: None,
            schools: SchoolDistricts::default(),
            tax: TaxDistricts::default(),
            environment: EnvironmentalInfo::default(),
            updated_at: None,
        }
    }

    /// Re-derive `pin10` from `pin`, discarding whatever the source supplied.
    pub fn normalized(mut self) -> Self {
        self.pin10 = derive_pin10(&self.pin);
        self
    }

    /// `[longitude, latitude]` when both are present.
    pub fn coordinates(&self) -> Option<[f64; 2]> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some([lon, lat]),
            _ => None,
        }
    }

    /// A property is mappable when it has both coordinates.
    pub fn is_mappable(&self) -> bool {
        self.coordinates().is_some()
    }

    /// Human-readable location label.
    ///
    /// Falls back to community area and ZIP when there is no street address,
    /// and to the PIN when neither is known.
    pub fn address_display(&self) -> String {
        if let Some(address) = non_empty(&self.address) {
            return address.to_string();
        }

        let mut parts = Vec::with_capacity(2);
        if let Some(area) = non_empty(&self.community_area_name) {
            parts.push(area.to_string());
        }
        if let Some(zip) = non_empty(&self.zip_code) {
            parts.push(format!("ZIP {}", zip));
        }

        if parts.is_empty() {
            format!("PIN {}", self.pin)
        } else {
            parts.join(", ")
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
