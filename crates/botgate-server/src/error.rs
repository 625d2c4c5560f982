// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use botgate_server_auth::AuthError;
use botgate_server_config::ConfigError;
use botgate_server_db::DbError;
use botgate_server_secrets::SecretsError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Errors raised while assembling or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("Secrets error: {0}")]
	Secrets(#[from] SecretsError),

	#[error("Auth error: {0}")]
	Auth(#[from] AuthError),

	/// The upstream HTTP client could not be built.
	#[error("HTTP client error: {0}")]
	HttpClient(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

/// Error response body. Every non-2xx response carries this shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, body) = match &self {
			ServerError::NotFound(what) => (
				StatusCode::NOT_FOUND,
				ErrorResponse::new("not_found", format!("Not found: {what}")),
			),
			other => {
				tracing::error!(error = %other, "internal server error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "Internal server error"),
				)
			}
		};
		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn not_found_is_404() {
		let response = ServerError::NotFound("/nope".into()).into_response();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[test]
	fn internal_errors_are_500() {
		let response = ServerError::Internal("boom".into()).into_response();
		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let response = ServerError::Db(DbError::Internal("pool closed".into())).into_response();
		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn error_response_shape() {
		let json = serde_json::to_value(ErrorResponse::new("bad_request", "nope")).unwrap();
		assert_eq!(json["error"], "bad_request");
		assert_eq!(json["message"], "nope");
	}
}
