// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAI chat completions adapter.

use async_trait::async_trait;
use botgate_common_secret::SecretString;
use botgate_server_auth::Provider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::adapter::{execute, ProviderAdapter};
use crate::error::ProviderError;
use crate::types::{ChatRequest, ChatResult};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for the OpenAI adapter.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
	pub base_url: String,
	pub model: String,
	pub max_tokens: u32,
	pub temperature: f32,
}

impl Default for OpenAiConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			model: DEFAULT_MODEL.to_string(),
			max_tokens: 1000,
			temperature: 0.7,
		}
	}
}

impl OpenAiConfig {
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

	pub fn with_temperature(mut self, temperature: f32) -> Self {
		self.temperature = temperature;
		self
	}
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
	model: &'a str,
	messages: [Message<'a>; 2],
	max_tokens: u32,
	temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
	role: &'static str,
	content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
	#[serde(default)]
	choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
	message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
	content: Option<String>,
}

pub struct OpenAiAdapter {
	client: Client,
	config: OpenAiConfig,
}

impl OpenAiAdapter {
	pub fn new(client: Client, config: OpenAiConfig) -> Self {
		Self { client, config }
	}

	fn completions_url(&self) -> String {
		format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
	}
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
	fn provider(&self) -> Provider {
		Provider::OpenAi
	}

	fn model(&self) -> &str {
		&self.config.model
	}

	#[instrument(skip(self, secret, request), fields(provider = "openai", model = %self.config.model))]
	async fn send(
		&self,
		secret: &SecretString,
		request: &ChatRequest,
	) -> Result<ChatResult, ProviderError> {
		let url = self.completions_url();
		debug!(url = %url, "sending chat completion");

		let body = CompletionRequest {
			model: &self.config.model,
			messages: [
				Message {
					role: "system",
					content: &request.system_prompt,
				},
				Message {
					role: "user",
					content: &request.user_message,
				},
			],
			max_tokens: self.config.max_tokens,
			temperature: self.config.temperature,
		};

		let builder = self
			.client
			.post(&url)
			.bearer_auth(secret.expose())
			.json(&body);
		let response: CompletionResponse = execute(Provider::OpenAi, builder).await?;

		let content = response
			.choices
			.into_iter()
			.next()
			.and_then(|choice| choice.message)
			.and_then(|message| message.content);
		Ok(ChatResult::from_content(content, Provider::OpenAi, &self.config.model))
	}
}
