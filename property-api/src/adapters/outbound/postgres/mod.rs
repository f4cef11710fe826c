//! PostgreSQL implementation of the PropertyStore port.

mod sql;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::{
    models::Property,
    ports::outbound::PropertyStore,
    query::{Field, Predicate, ScanRequest, ValueCount},
    StoreError,
};

use sql::{order_by, push_predicate, text_column};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => StoreError::Corrupt(err.to_string()),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Adapter that reads properties from the `properties` table.
#[derive(Clone)]
pub struct PgPropertyStore {
    pool: PgPool,
}

impl PgPropertyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `SELECT * FROM properties WHERE <predicate>`
    fn select_where(predicate: &Predicate) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT * FROM properties WHERE ");
        push_predicate(&mut builder, predicate);
        builder
    }

    /// Non-blank filter on the textual value of `field`.
    fn non_blank(field: Field) -> String {
        format!("btrim({}) <> ''", text_column(field))
    }
}

fn bind_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl PropertyStore for PgPropertyStore {
    async fn find_by_pin(&self, pin: &str) -> Result<Option<Property>, StoreError> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE pin = $1")
            .bind(pin)
            .fetch_optional(&self.pool)
            .await?;

        Ok(property.map(Property::normalized))
    }

    async fn scan(
        &self,
        predicate: &Predicate,
        request: ScanRequest,
    ) -> Result<Vec<Property>, StoreError> {
        let mut builder = Self::select_where(predicate);
        builder
            .push(" ORDER BY ")
            .push(order_by(request.ordering))
            .push(" LIMIT ")
            .push_bind(bind_limit(request.limit))
            .push(" OFFSET ")
            .push_bind(bind_limit(request.offset));

        let properties = builder
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await?;

        Ok(properties.into_iter().map(Property::normalized).collect())
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM properties WHERE ");
        push_predicate(&mut builder, predicate);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn distinct_values(
        &self,
        field: Field,
        predicate: &Predicate,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT value FROM (SELECT {} AS value, MIN(pin COLLATE \"C\") AS first_pin \
             FROM properties WHERE {} AND ",
            text_column(field),
            Self::non_blank(field),
        ));
        push_predicate(&mut builder, predicate);
        builder
            .push(" GROUP BY 1) AS candidates ORDER BY first_pin LIMIT ")
            .push_bind(bind_limit(limit));

        let values = builder
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await?;
        Ok(values)
    }

    async fn count_distinct(&self, field: Field) -> Result<u64, StoreError> {
        let sql = format!(
            "SELECT COUNT(DISTINCT {}) FROM properties WHERE {}",
            text_column(field),
            Self::non_blank(field),
        );

        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn top_values(&self, field: Field, limit: usize) -> Result<Vec<ValueCount>, StoreError> {
        let sql = format!(
            "SELECT {} AS value, COUNT(*) AS count FROM properties WHERE {} \
             GROUP BY 1 ORDER BY count DESC, value COLLATE \"C\" ASC LIMIT $1",
            text_column(field),
            Self::non_blank(field),
        );

        let top = sqlx::query_as::<_, ValueCount>(&sql)
            .bind(bind_limit(limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(top)
    }
}
