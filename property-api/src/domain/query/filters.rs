use super::{
    geo::BoundingBox,
    predicate::{Field, Predicate},
};

/// Exact-match filters for a property listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilters {
    pub class_code: Option<String>,
    pub zip_code: Option<String>,
    pub ward: Option<String>,
    pub township: Option<String>,
    pub community_area: Option<String>,
    pub triad: Option<String>,
    /// Whitespace-separated terms, each matching a substring of the PIN,
    /// short PIN, community area or ZIP code.
    pub search: Option<String>,
}

impl ListFilters {
    pub fn to_predicate(&self) -> Predicate {
        let exact = [
            (Field::ClassCode, &self.class_code),
            (Field::ZipCode, &self.zip_code),
            (Field::Ward, &self.ward),
            (Field::Township, &self.township),
            (Field::CommunityArea, &self.community_area),
            (Field::Triad, &self.triad),
        ];

        let mut predicate = exact
            .into_iter()
            .filter_map(|(field, value)| non_blank(value).map(|value| (field, value)))
            .fold(Predicate::All, |acc, (field, value)| {
                acc.and(Predicate::equals(field, value))
            });

        if let Some(search) = non_blank(&self.search) {
            for term in search.split_whitespace() {
                predicate = predicate.and(Predicate::any_of(
                    [Field::Pin, Field::Pin10, Field::CommunityArea, Field::ZipCode]
                        .into_iter()
                        .map(|field| Predicate::contains(field, term)),
                ));
            }
        }

        predicate
    }
}

/// Selection for a map projection. Only mappable records are ever selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoJsonFilters {
    pub bbox: Option<BoundingBox>,
    /// Community area substring
    pub area: Option<String>,
    pub class_code: Option<String>,
}

impl GeoJsonFilters {
    pub fn to_predicate(&self) -> Predicate {
        let mut predicate =
            Predicate::present(Field::Latitude).and(Predicate::present(Field::Longitude));

        if let Some(bbox) = &self.bbox {
            predicate = predicate.and(bbox.to_predicate());
        }
        if let Some(area) = non_blank(&self.area) {
            predicate = predicate.and(Predicate::contains(Field::CommunityArea, area));
        }
        if let Some(class_code) = non_blank(&self.class_code) {
            predicate = predicate.and(Predicate::equals(Field::ClassCode, class_code));
        }

        predicate
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Property;

    fn property(pin: &str) -> Property {
        let mut property = Property::new(pin);
        property.class_code = Some("2-11".to_string());
        property.zip_code = Some("60614".to_string());
        property.ward_num = Some(43);
        property.community_area_name = Some("LINCOLN PARK".to_string());
        property.latitude = Some(41.92);
        property.longitude = Some(-87.65);
        property
    }

    #[test]
    fn empty_filters_match_everything() {
        assert_eq!(ListFilters::default().to_predicate(), Predicate::All);
    }

    #[test]
    fn list_filters_are_exact() {
        let property = property("14-33-100-001-0000");

        let filters = ListFilters {
            ward: Some("43".to_string()),
            community_area: Some("LINCOLN PARK".to_string()),
            ..Default::default()
        };
        assert!(filters.to_predicate().matches(&property));

        let partial = ListFilters {
            community_area: Some("LINCOLN".to_string()),
            ..Default::default()
        };
        assert!(!partial.to_predicate().matches(&property));
    }

    #[test]
    fn every_search_term_must_match_some_field() {
        let property = property("14-33-100-001-0000");

        let filters = ListFilters {
            search: Some("lincoln 60614".to_string()),
            ..Default::default()
        };
        assert!(filters.to_predicate().matches(&property));

        let filters = ListFilters {
            search: Some("lincoln 60601".to_string()),
            ..Default::default()
        };
        assert!(!filters.to_predicate().matches(&property));
    }

    #[test]
    fn geojson_filters_require_coordinates() {
        let mut unmapped = property("1");
        unmapped.longitude = None;

        let filters = GeoJsonFilters::default();
        assert!(filters.to_predicate().matches(&property("2")));
        assert!(!filters.to_predicate().matches(&unmapped));
    }

    #[test]
    fn geojson_filters_combine_box_area_and_class() {
        let property = property("1");
        let filters = GeoJsonFilters {
            bbox: Some(BoundingBox::from_edges(42.0, 41.0, -87.0, -88.0)),
            area: Some("park".to_string()),
            class_code: Some("2-11".to_string()),
        };
        assert!(filters.to_predicate().matches(&property));

        let filters = GeoJsonFilters {
            class_code: Some("2-12".to_string()),
            ..filters
        };
        assert!(!filters.to_predicate().matches(&property));
    }
}
