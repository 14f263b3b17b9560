//! Liveness probe.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use applydiary_core::defaults::SERVICE_NAME;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
}

/// Report that the process is serving requests.
#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is up", body = HealthResponse)))]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
    })
}
