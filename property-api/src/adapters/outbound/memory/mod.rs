//! In-memory implementation of the PropertyStore port.

mod seed;

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use itertools::Itertools;

use crate::domain::{
    models::Property,
    ports::outbound::PropertyStore,
    query::{Field, Predicate, ScanRequest, ValueCount},
    StoreError,
};

pub use seed::load_seed;

/// Immutable PIN-ordered snapshot of the dataset.
///
/// Cloning is cheap and every clone shares the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPropertyStore {
    properties: Arc<BTreeMap<String, Property>>,
}

impl InMemoryPropertyStore {
    /// Build a store from `properties`. A later record with the same PIN
    /// replaces an earlier one.
    pub fn new(properties: impl IntoIterator<Item = Property>) -> Self {
        let properties = properties
            .into_iter()
            .map(Property::normalized)
            .map(|property| (property.pin.clone(), property))
            .collect();

        Self {
            properties: Arc::new(properties),
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn matching<'a>(&'a self, predicate: &'a Predicate) -> impl Iterator<Item = &'a Property> + 'a {
        self.properties
            .values()
            .filter(move |property| predicate.matches(property))
    }

    fn field_values<'a>(
        &'a self,
        field: Field,
        predicate: &'a Predicate,
    ) -> impl Iterator<Item = String> + 'a {
        self.matching(predicate)
            .filter_map(move |property| field.text(property))
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.into_owned())
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn find_by_pin(&self, pin: &str) -> Result<Option<Property>, StoreError> {
        Ok(self.properties.get(pin).cloned())
    }

    async fn scan(
        &self,
        predicate: &Predicate,
        request: ScanRequest,
    ) -> Result<Vec<Property>, StoreError> {
        let mut matches: Vec<&Property> = self.matching(predicate).collect();
        if !request.ordering.is_natural() {
            matches.sort_by(|a, b| request.ordering.compare(a, b));
        }

        Ok(matches
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect())
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        Ok(self.matching(predicate).count() as u64)
    }

    async fn distinct_values(
        &self,
        field: Field,
        predicate: &Predicate,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self.field_values(field, predicate).unique().take(limit).collect())
    }

    async fn count_distinct(&self, field: Field) -> Result<u64, StoreError> {
        Ok(self.field_values(field, &Predicate::All).unique().count() as u64)
    }

    async fn top_values(&self, field: Field, limit: usize) -> Result<Vec<ValueCount>, StoreError> {
        let top = self
            .field_values(field, &Predicate::All)
            .counts()
            .into_iter()
            .sorted_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)))
            .take(limit)
            .map(|(value, count)| ValueCount {
                value,
                count: count as i64,
            })
            .collect();

        Ok(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::Ordering;

    fn property(pin: &str, area: Option<&str>) -> Property {
        let mut property = Property::new(pin);
        property.community_area_name = area.map(str::to_string);
        property
    }

    fn store() -> InMemoryPropertyStore {
        InMemoryPropertyStore::new(vec![
            property("3", Some("LOOP")),
            property("1", Some("UPTOWN")),
            property("2", Some("LOOP")),
            property("4", Some("  ")),
            property("5", None),
        ])
    }

    #[tokio::test]
    async fn later_record_with_same_pin_wins() {
        let store = InMemoryPropertyStore::new(vec![
            property("1", Some("LOOP")),
            property("1", Some("UPTOWN")),
        ]);

        assert_eq!(store.len(), 1);
        let found = store.find_by_pin("1").await.unwrap().unwrap();
        assert_eq!(found.community_area_name.as_deref(), Some("UPTOWN"));
    }

    #[tokio::test]
    async fn recomputes_pin10_on_load() {
        let mut record = Property::new("17-10-100-100-0000");
        record.pin10 = "wrong".to_string();
        let store = InMemoryPropertyStore::new(vec![record]);

        let found = store.find_by_pin("17-10-100-100-0000").await.unwrap().unwrap();
        assert_eq!(found.pin10, "1710100100");
    }

    #[tokio::test]
    async fn scan_applies_order_and_window() {
        let store = store();
        let request = ScanRequest {
            ordering: "-pin".parse::<Ordering>().unwrap(),
            offset: 1,
            limit: 2,
        };

        let pins: Vec<_> = store
            .scan(&Predicate::All, request)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.pin)
            .collect();
        assert_eq!(pins, vec!["4", "3"]);
    }

    #[tokio::test]
    async fn distinct_values_in_pin_order_without_blanks() {
        let store = store();
        let values = store
            .distinct_values(Field::CommunityArea, &Predicate::All, 10)
            .await
            .unwrap();
        assert_eq!(values, vec!["UPTOWN", "LOOP"]);
    }

    #[tokio::test]
    async fn stats_helpers_skip_blank_values() {
        let store = store();
        assert_eq!(store.count_distinct(Field::CommunityArea).await.unwrap(), 2);

        let top = store.top_values(Field::CommunityArea, 10).await.unwrap();
        assert_eq!(
            top,
            vec![
                ValueCount {
                    value: "LOOP".to_string(),
                    count: 2
                },
                ValueCount {
                    value: "UPTOWN".to_string(),
                    count: 1
                },
            ]
        );
    }
}
