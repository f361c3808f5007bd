use crate::utility::db_pool::create_db_pool;
use axum::routing::get;
use axum::Router;
use axum_prometheus::{metrics_exporter_prometheus::PrometheusHandle, PrometheusMetricLayer};
use bankline_core::{AppState, LedgerStore, MemoryStore, PgStore};
use bankline_primitives::models::app_config::{AppConfig, StoreBackend};
use eyre::Report;
use http::HeaderValue;
use std::env;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub fn build_cors() -> Result<CorsLayer, Report> {
    let origins = env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into());

    let allowed_origins = origins
        .split(',')
        .map(|s| s.trim().parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| eyre::eyre!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(allowed_origins))
}

pub fn load_env() {
    if dotenvy::dotenv().is_ok() {
        info!("Loaded .env file");
    } else {
        info!("No .env file found, using system environment");
    }
}

pub fn build_router(
    state: Arc<AppState>,
    metric_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
) -> Result<Router, Report> {
    let cors = build_cors()?;

    Ok(bankline_api::app::create_router(state)
        .route(
            "/metrics",
            get(move || std::future::ready(metric_handle.render())),
        )
        .layer(metric_layer)
        .layer(cors))
}

/// Opens the configured ledger store. Postgres migrations are applied before
/// the first request is served.
pub fn initialize_store(config: &AppConfig) -> Result<Arc<dyn LedgerStore>, Report> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory ledger store; balances are lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_ref()
                .ok_or_else(|| eyre::eyre!("DATABASE_URL must be set"))?;

            let store = PgStore::new(create_db_pool(url)?);
            store
                .run_migrations()
                .map_err(|e| eyre::eyre!("Failed to apply migrations: {}", e))?;

            info!("Ledger store ready (postgres)");
            Ok(Arc::new(store))
        }
    }
}
