//! Planar-degree bounding boxes for proximity queries.
//!
//! Distances are approximated as `111 km` per degree of latitude. This is
//! only accurate for small radii away from the poles, and the resulting
//! rectangle over-includes the corners of the true circle.
//!
//! The default longitude delta is `radius / (111 * cos(lat))`. The older
//! degree-based formula `radius / (111 * |lat|)` is still available as
//! [`LongitudeScaling::Degrees`], but it is undefined at the equator and
//! produces boxes narrower than the circle at most latitudes.
//!
//! A box that crosses the antimeridian is split into two longitude ranges.

use serde::Deserialize;

use super::predicate::{Field, Predicate};
use crate::domain::QueryError;

/// Approximate kilometres per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Floor for the longitude scale factor near the poles.
const MIN_LONGITUDE_SCALE: f64 = 1e-6;

/// How a radius is converted into a longitude delta at the query latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongitudeScaling {
    /// `radius / (111 * cos(lat))`. Always contains the true circle for
    /// small radii and is defined at the equator.
    #[default]
    Cosine,
    /// `radius / (111 * |lat|)`, the legacy degree-based formula. Undefined
    /// at latitude 0, which is rejected. Does not guarantee containment of
    /// the circle.
    Degrees,
}

/// Axis-aligned latitude/longitude rectangle, inclusive on every edge.
///
/// `west` may fall below -180 or `east` above 180 when the box crosses the
/// antimeridian; see [`BoundingBox::longitude_ranges`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn from_edges(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Rectangle approximating a circle of `radius_km` around a point.
    pub fn around(
        lat: f64,
        lon: f64,
        radius_km: f64,
        scaling: LongitudeScaling,
    ) -> Result<Self, QueryError> {
        validate_coordinates(lat, lon)?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(QueryError::invalid("radius must be a positive number"));
        }

        let lat_delta = radius_km / KM_PER_DEGREE;
        let lon_delta = match scaling {
            LongitudeScaling::Cosine => {
                let scale = lat.to_radians().cos().abs().max(MIN_LONGITUDE_SCALE);
                (radius_km / (KM_PER_DEGREE * scale)).min(180.0)
            }
            LongitudeScaling::Degrees => {
                if lat == 0.0 {
                    return Err(QueryError::invalid(
                        "latitude 0 is not supported with degree-based longitude scaling",
                    ));
                }
                (radius_km / (KM_PER_DEGREE * lat.abs())).min(180.0)
            }
        };

        Ok(Self {
            south: lat - lat_delta,
            north: lat + lat_delta,
            west: lon - lon_delta,
            east: lon + lon_delta,
        })
    }

    /// Inclusive longitude ranges inside `[-180, 180]` covered by the box.
    fn longitude_ranges(&self) -> Vec<(f64, f64)> {
        if self.west < -180.0 {
            vec![(self.west + 360.0, 180.0), (-180.0, self.east)]
        } else if self.east > 180.0 {
            vec![(self.west, 180.0), (-180.0, self.east - 360.0)]
        } else {
            vec![(self.west, self.east)]
        }
    }

    #[cfg(test)]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.south <= lat
            && lat <= self.north
            && self
                .longitude_ranges()
                .into_iter()
                .any(|(west, east)| west <= lon && lon <= east)
    }

    /// Latitude and longitude range tests. Records missing either coordinate
    /// never match.
    pub fn to_predicate(&self) -> Predicate {
        let longitude = Predicate::any_of(
            self.longitude_ranges()
                .into_iter()
                .map(|(west, east)| Predicate::between(Field::Longitude, west, east)),
        );
        Predicate::between(Field::Latitude, self.south, self.north).and(longitude)
    }
}

/// Reject non-finite or out-of-range coordinates.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), QueryError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(QueryError::invalid(format!("invalid latitude: {}", lat)));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(QueryError::invalid(format!("invalid longitude: {}", lon)));
    }
    Ok(())
}
