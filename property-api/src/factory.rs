//! Composition root: the only place that names concrete store adapters.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    adapters::outbound::{
        memory::{load_seed, InMemoryPropertyStore},
        postgres::PgPropertyStore,
    },
    config::{Settings, StoreBackend},
    domain::{ports::inbound::PropertyQueryService, services::PropertyQueryServiceImpl},
};

/// Build the query service over the configured store backend.
pub async fn build_query_service(
    settings: &Settings,
) -> anyhow::Result<Arc<dyn PropertyQueryService>> {
    let service: Arc<dyn PropertyQueryService> = match settings.store.backend {
        StoreBackend::Memory => {
            let store = match &settings.store.seed_path {
                Some(path) => load_seed(path)
                    .await
                    .with_context(|| format!("Failed to load seed data from {}", path))?,
                None => {
                    tracing::warn!("No seed_path configured, starting with an empty store");
                    InMemoryPropertyStore::default()
                }
            };
            Arc::new(PropertyQueryServiceImpl::new(
                Arc::new(store),
                settings.query.clone(),
            ))
        }
        StoreBackend::Postgres => {
            let database = settings
                .database
                .as_ref()
                .context("database settings are required for the postgres backend")?;
            let pool = PgPoolOptions::new()
                .acquire_timeout(Duration::from_secs(5))
                .connect_lazy_with(database.with_db());

            if settings.store.run_migrations {
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run database migrations")?;
            }

            Arc::new(PropertyQueryServiceImpl::new(
                Arc::new(PgPropertyStore::new(pool)),
                settings.query.clone(),
            ))
        }
    };

    tracing::info!("Using {:?} property store", settings.store.backend);
    Ok(service)
}
