// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP route handlers.

pub mod api_keys;
pub mod auth;
pub mod bots;
pub mod chat;
pub mod health;

use axum::http::Uri;

use crate::error::ServerError;

/// Fallback for unknown routes, so they get the usual error body.
pub async fn not_found(uri: Uri) -> ServerError {
	ServerError::NotFound(uri.path().to_string())
}
