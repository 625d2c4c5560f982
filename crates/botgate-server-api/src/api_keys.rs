// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider credential ("API key") types.
//!
//! Responses carry a masked preview only. Neither the plaintext nor the
//! ciphertext ever appears here.

use botgate_common_secret::SecretString;
use botgate_server_db::CredentialRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Request to store a provider credential.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
	/// `openai`, `anthropic`, `google`, `azure` or `custom`.
	#[serde(default)]
	pub provider: String,
	#[serde(default)]
	pub name: String,
	/// The provider secret. Encrypted before it is stored.
	#[serde(default)]
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = Password))]
	pub api_key: Option<SecretString>,
}

/// Partial update. At least one field must be present.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateApiKeyRequest {
	#[serde(default)]
	pub is_active: Option<bool>,
	#[serde(default)]
	pub name: Option<String>,
}

/// A stored credential as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
	pub id: String,
	pub provider: String,
	pub name: String,
	/// e.g. `sk-p...wxyz`, or `***` for short keys.
	pub key_preview: String,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for ApiKeyResponse {
	fn from(record: &CredentialRecord) -> Self {
		Self {
			id: record.id.to_string(),
			provider: record.provider.to_string(),
			name: record.name.clone(),
			key_preview: record.key_preview.clone(),
			is_active: record.is_active,
			created_at: record.created_at,
		}
	}
}

/// Error response for API key operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ApiKeyErrorResponse {
	pub error: String,
	pub message: String,
}
