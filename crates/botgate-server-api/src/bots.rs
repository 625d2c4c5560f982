// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use botgate_server_db::Bot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Request to create a bot.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateBotRequest {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	/// Credential to chat with. Must belong to the caller.
	#[serde(default)]
	pub api_key_id: Option<String>,
}

/// Request to replace a bot's fields.
///
/// `apiKeyId` is tri-state: absent keeps the current credential, `null`
/// detaches it, and a string attaches that credential.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateBotRequest {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default, deserialize_with = "deserialize_some")]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
	pub api_key_id: Option<Option<String>>,
}

/// Distinguish an explicit `null` from an absent field.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BotResponse {
	pub id: String,
	pub name: String,
	pub description: Option<String>,
	pub api_key_id: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<&Bot> for BotResponse {
	fn from(bot: &Bot) -> Self {
		Self {
			id: bot.id.to_string(),
			name: bot.name.clone(),
			description: bot.description.clone(),
			api_key_id: bot.api_key_id.map(|id| id.to_string()),
			created_at: bot.created_at,
			updated_at: bot.updated_at,
		}
	}
}

/// Error response for bot operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BotErrorResponse {
	pub error: String,
	pub message: String,
}
