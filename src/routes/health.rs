//! Health check endpoint
//!
//! GET /api/health (also /health, /healthz) always returns 200 while the
//! process is up; the body reports database connectivity and catalog size
//! so operators can tell a degraded instance from a healthy one.

use hyper::StatusCode;
use serde::Serialize;
use std::sync::Arc;

use crate::routes::{json_response, BoxBody};
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall health status (true if the service is running)
    pub healthy: bool,
    /// 'online' when the database is reachable, 'degraded' otherwise
    pub status: &'static str,
    pub version: &'static str,
    /// Number of schemes in the loaded catalog
    pub schemes: usize,
    pub database: DatabaseHealth,
    pub timestamp: String,
    /// Operating mode: 'production' or 'dev'
    pub mode: &'static str,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
}

/// Liveness probe, always 200 while the process runs
pub fn health_check(state: Arc<AppState>) -> hyper::Response<BoxBody> {
    let connected = state.mongo.is_some();

    let response = HealthResponse {
        healthy: true,
        status: if connected { "online" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        schemes: state.catalog.len(),
        database: DatabaseHealth { connected },
        timestamp: chrono::Utc::now().to_rfc3339(),
        mode: if state.args.dev_mode { "dev" } else { "production" },
    };

    json_response(StatusCode::OK, &response)
}
