use async_trait::async_trait;

use crate::domain::{
    models::Property,
    query::{Field, Predicate, ScanRequest, ValueCount},
    StoreError,
};

/// Outbound port for reading the property dataset.
///
/// Every method takes the same [`Predicate`] tree, so the engine never knows
/// whether it is talking to memory or a database. Implementations must return
/// records with `pin10` derived from `pin`.
#[async_trait]
pub trait PropertyStore: Send + Sync + 'static {
    /// Exact lookup by PIN.
    async fn find_by_pin(&self, pin: &str) -> Result<Option<Property>, StoreError>;

    /// Matching records in the requested order and window.
    async fn scan(
        &self,
        predicate: &Predicate,
        request: ScanRequest,
    ) -> Result<Vec<Property>, StoreError>;

    /// Number of matching records.
    async fn count(&self, predicate: &Predicate) -> Result<u64, StoreError>;

    /// Distinct non-blank values of `field` among matching records, in order of
    /// first appearance by PIN, at most `limit` of them.
    async fn distinct_values(
        &self,
        field: Field,
        predicate: &Predicate,
        limit: usize,
    ) -> Result<Vec<String>, StoreError>;

    /// Number of distinct non-blank values of `field` across the store.
    async fn count_distinct(&self, field: Field) -> Result<u64, StoreError>;

    /// Most common non-blank values of `field`, highest count first and ties
    /// by value.
    async fn top_values(&self, field: Field, limit: usize) -> Result<Vec<ValueCount>, StoreError>;
}
