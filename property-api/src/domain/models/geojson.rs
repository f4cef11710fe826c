//! GeoJSON point features for map rendering.

use serde::Serialize;

use super::Property;

/// Point geometry at `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
}

/// Fixed property set rendered on every map feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    pub pin: String,
    pub community_area: Option<String>,
    pub zip_code: Option<String>,
    pub class_code: Option<String>,
    pub ward: Option<i32>,
    pub popup_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    /// `None` serializes as `null` for records without coordinates.
    pub geometry: Option<Geometry>,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature>,
}

impl Feature {
    /// Render a single record. Geometry is `None` when the record is not mappable.
    pub fn from_property(property: &Property) -> Self {
        let popup_content = format!(
            "PIN: {}<br/>Area: {}<br/>ZIP: {}",
            property.pin,
            property.community_area_name.as_deref().unwrap_or("Unknown"),
            property.zip_code.as_deref().unwrap_or("N/A"),
        );

        Self {
            kind: "Feature",
            geometry: property
                .coordinates()
                .map(|coordinates| Geometry::Point { coordinates }),
            properties: FeatureProperties {
                pin: property.pin.clone(),
                community_area: property.community_area_name.clone(),
                zip_code: property.zip_code.clone(),
                class_code: property.class_code.clone(),
                ward: property.ward_num,
                popup_content,
            },
        }
    }
}

impl FeatureCollection {
    /// Build a collection from `properties`, preserving their order.
    ///
    /// Records without both coordinates are skipped, so no feature in a
    /// collection ever carries `null` geometry.
    pub fn from_properties<'a>(properties: impl IntoIterator<Item = &'a Property>) -> Self {
        let features = properties
            .into_iter()
            .filter(|property| property.is_mappable())
            .map(Feature::from_property)
            .collect();

        Self {
            kind: "FeatureCollection",
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn located(pin: &str, lat: Option<f64>, lon: Option<f64>) -> Property {
        let mut property = Property::new(pin);
        property.latitude = lat;
        property.longitude = lon;
        property
    }

    #[test]
    fn collection_skips_unmappable_records() {
        let properties = vec![
            located("17101", Some(41.88), Some(-87.63)),
            located("17102", Some(41.89), None),
        ];

        let collection = FeatureCollection::from_properties(&properties);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features[0].properties.pin, "17101");
    }

    #[test]
    fn feature_serializes_as_geojson_point() {
        let mut property = located("17101", Some(41.88), Some(-87.63));
        property.community_area_name = Some("LOOP".to_string());
        property.ward_num = Some(42);

        let value = serde_json::to_value(Feature::from_property(&property)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-87.63, 41.88] },
                "properties": {
                    "pin": "17101",
                    "community_area": "LOOP",
                    "zip_code": null,
                    "class_code": null,
                    "ward": 42,
                    "popup_content": "PIN: 17101<br/>Area: LOOP<br/>ZIP: N/A"
                }
            })
        );
    }

    #[test]
    fn single_feature_emits_null_geometry() {
        let property = located("17102", None, Some(-87.63));
        let value = serde_json::to_value(Feature::from_property(&property)).unwrap();
        assert!(value["geometry"].is_null());
    }

    #[test]
    fn collection_type_tag() {
        let properties: Vec<Property> = Vec::new();
        let collection = FeatureCollection::from_properties(&properties);
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"], json!([]));
    }
}
