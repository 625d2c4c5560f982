// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Anthropic Messages API adapter.

use async_trait::async_trait;
use botgate_common_secret::SecretString;
use botgate_server_auth::Provider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::adapter::{execute, ProviderAdapter};
use crate::error::ProviderError;
use crate::types::{ChatRequest, ChatResult};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic adapter.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
	pub base_url: String,
	pub model: String,
	pub max_tokens: u32,
	/// Sent as the `anthropic-version` header.
	pub api_version: String,
}

impl Default for AnthropicConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			model: DEFAULT_MODEL.to_string(),
			max_tokens: 1000,
			api_version: DEFAULT_API_VERSION.to_string(),
		}
	}
}

impl AnthropicConfig {
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	pub fn with_model(mut self, model: impl Into<String>) -> Self {
		self.model = model.into();
		self
	}

	pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
		self.max_tokens = max_tokens;
		self
	}

	pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
		self.api_version = api_version.into();
		self
	}
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
	model: &'a str,
	max_tokens: u32,
	system: &'a str,
	messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
	role: &'static str,
	content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
	#[serde(default)]
	content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
	text: Option<String>,
}

pub struct AnthropicAdapter {
	client: Client,
	config: AnthropicConfig,
}

impl AnthropicAdapter {
	pub fn new(client: Client, config: AnthropicConfig) -> Self {
		Self { client, config }
	}

	fn messages_url(&self) -> String {
		format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
	}
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
	fn provider(&self) -> Provider {
		Provider::Anthropic
	}

	fn model(&self) -> &str {
		&self.config.model
	}

	#[instrument(skip(self, secret, request), fields(provider = "anthropic", model = %self.config.model))]
	async fn send(
		&self,
		secret: &SecretString,
		request: &ChatRequest,
	) -> Result<ChatResult, ProviderError> {
		let url = self.messages_url();
		debug!(url = %url, "sending messages request");

		// The system prompt is a top-level field, not a turn.
		let body = MessagesRequest {
			model: &self.config.model,
			max_tokens: self.config.max_tokens,
			system: &request.system_prompt,
			messages: [Message {
				role: "user",
				content: &request.user_message,
			}],
		};

		let builder = self
			.client
			.post(&url)
			.header("x-api-key", secret.expose())
			.header("anthropic-version", &self.config.api_version)
			.json(&body);
		let response: MessagesResponse = execute(Provider::Anthropic, builder).await?;

		let content = response.content.into_iter().next().and_then(|block| block.text);
		Ok(ChatResult::from_content(content, Provider::Anthropic, &self.config.model))
	}
}
