// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types for the botgate HTTP API.
//!
//! JSON bodies use camelCase field names. Every error body has the shape
//! `{ "error": <code>, "message": <text> }`.

pub mod api_keys;
pub mod auth;
pub mod bots;
pub mod chat;
pub mod health;

pub use api_keys::{ApiKeyErrorResponse, ApiKeyResponse, CreateApiKeyRequest, UpdateApiKeyRequest};
pub use auth::{AuthErrorResponse, AuthSuccessResponse, LoginRequest, RegisterRequest, UserSummary};
pub use bots::{BotErrorResponse, BotResponse, CreateBotRequest, UpdateBotRequest};
pub use chat::{ChatErrorResponse, ChatRequest, ChatResponse};
pub use health::{HealthResponse, HealthStatus};

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Body for operations that only report success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SuccessResponse {
	pub success: bool,
}

impl SuccessResponse {
	pub fn ok() -> Self {
		Self { success: true }
	}
}
