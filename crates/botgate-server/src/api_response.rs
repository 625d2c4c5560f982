// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API response helpers and macros.
//!
//! This module provides common response patterns for HTTP handlers:
//! - Error response helpers (bad_request, conflict, not_found, internal_error)
//! - Macros for early-return error handling (parse_id!, parse_json!, validate_or_error!)
//! - Trait implementations for error response types (impl_api_error_response!)

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde::Serialize;

use crate::error::ErrorResponse;
use crate::validation::ValidationError;

/// Trait for API error response types that have `error` and `message` fields.
pub trait ApiErrorResponse: Serialize + Send {
	fn new(error: impl Into<String>, message: impl Into<String>) -> Self;
}

/// Implement `ApiErrorResponse` for a struct with `error` and `message` fields.
///
/// # Example
///
/// ```ignore
/// impl_api_error_response!(BotErrorResponse);
/// ```
#[macro_export]
macro_rules! impl_api_error_response {
	($ty:ty) => {
		impl $crate::api_response::ApiErrorResponse for $ty {
			fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
				Self {
					error: error.into(),
					message: message.into(),
				}
			}
		}
	};
}

impl_api_error_response!(ErrorResponse);

/// Parse a path id and return early with 404 if it is malformed.
///
/// A malformed id can never name a record the caller owns, so it is reported
/// exactly like a missing one.
///
/// # Example
///
/// ```ignore
/// let bot_id = parse_id!(BotErrorResponse, BotId::parse(&id), "Bot not found");
/// ```
#[macro_export]
macro_rules! parse_id {
	($error_ty:ty, $parse_expr:expr, $message:expr) => {
		match $parse_expr {
			Some(id) => id,
			None => {
				return $crate::api_response::not_found::<$error_ty>($message).into_response();
			}
		}
	};
}

/// Unwrap a JSON body and return early with 400 if it could not be read.
///
/// # Example
///
/// ```ignore
/// let payload = parse_json!(BotErrorResponse, payload);
/// ```
#[macro_export]
macro_rules! parse_json {
	($error_ty:ty, $payload:expr) => {
		match $payload {
			Ok(axum::Json(payload)) => payload,
			Err(rejection) => {
				return $crate::api_response::json_rejection::<$error_ty>(rejection).into_response();
			}
		}
	};
}

/// Run a validation and return early with 400 if it fails.
///
/// # Example
///
/// ```ignore
/// let name = validate_or_error!(BotErrorResponse, validate_bot_name(&payload.name));
/// ```
#[macro_export]
macro_rules! validate_or_error {
	($error_ty:ty, $validate_expr:expr) => {
		match $validate_expr {
			Ok(value) => value,
			Err(e) => {
				return $crate::api_response::validation_error::<$error_ty>(e).into_response();
			}
		}
	};
}

/// Create a 400 Bad Request response from a ValidationError.
pub fn validation_error<T: ApiErrorResponse>(e: ValidationError) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(e.error, e.message)))
}

/// Create a 400 Bad Request response from a body that failed to parse.
pub fn json_rejection<T: ApiErrorResponse>(rejection: JsonRejection) -> (StatusCode, Json<T>) {
	tracing::debug!(error = %rejection.body_text(), "rejected request body");
	(
		StatusCode::BAD_REQUEST,
		Json(T::new("invalid_body", "Request body must be valid JSON")),
	)
}

/// Create a 400 Bad Request response.
pub fn bad_request<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(error, message)))
}

/// Create a 409 Conflict response.
pub fn conflict<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::CONFLICT, Json(T::new(error, message)))
}

/// Create a 404 Not Found response.
pub fn not_found<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::NOT_FOUND, Json(T::new("not_found", message)))
}

/// Create a 500 Internal Server Error response.
pub fn internal_error<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(T::new("internal_error", message)),
	)
}

/// Create a 403 Forbidden response.
pub fn forbidden<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::FORBIDDEN, Json(T::new(error, message)))
}

/// Create a 401 Unauthorized response.
pub fn unauthorized<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::UNAUTHORIZED, Json(T::new(error, message)))
}
