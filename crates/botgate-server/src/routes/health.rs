// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

pub use botgate_server_api::health::*;

use crate::api::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server and database are healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Liveness plus a database round trip.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = match botgate_server_db::ping(&state.pool).await {
		Ok(()) => HealthStatus::Healthy,
		Err(e) => {
			tracing::error!(error = %e, "database health check failed");
			HealthStatus::Unhealthy
		}
	};

	let status_code = match database {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(
		status_code,
		Json(HealthResponse {
			status: database,
			version: env!("CARGO_PKG_VERSION").to_string(),
			database,
		}),
	)
}
