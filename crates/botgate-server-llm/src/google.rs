// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Google Gemini `generateContent` adapter.
//!
//! The key travels as the `key` query parameter, so the request URL is a
//! secret here and is never logged or kept in errors.

use async_trait::async_trait;
use botgate_common_secret::SecretString;
use botgate_server_auth::Provider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::adapter::{execute, ProviderAdapter};
use crate::error::ProviderError;
use crate::types::{ChatRequest, ChatResult};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Configuration for the Google adapter.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
	pub base_url: String,
	pub model: String,
	pub max_tokens: u32,
}

impl Default for GoogleConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			model: DEFAULT_MODEL.to_string(),
			max_tokens: 1000,
		}
	}
}

impl GoogleConfig {
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
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
	contents: [Content<'a>; 1],
	generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
	parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
	text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
	max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
	content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
	#[serde(default)]
	parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
	text: Option<String>,
}

/// Flatten a role-tagged exchange into one prompt, since `generateContent`
/// has no separate system slot here.
fn flatten_prompt(request: &ChatRequest) -> String {
	format!(
		"system: {}\n\nuser: {}",
		request.system_prompt, request.user_message
	)
}

pub struct GoogleAdapter {
	client: Client,
	config: GoogleConfig,
}

impl GoogleAdapter {
	pub fn new(client: Client, config: GoogleConfig) -> Self {
		Self { client, config }
	}

	fn generate_url(&self) -> String {
		format!(
			"{}/v1beta/models/{}:generateContent",
			self.config.base_url.trim_end_matches('/'),
			self.config.model
		)
	}
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
	fn provider(&self) -> Provider {
		Provider::Google
	}

	fn model(&self) -> &str {
		&self.config.model
	}

	#[instrument(skip(self, secret, request), fields(provider = "google", model = %self.config.model))]
	async fn send(
		&self,
		secret: &SecretString,
		request: &ChatRequest,
	) -> Result<ChatResult, ProviderError> {
		debug!("sending generateContent request");

		let prompt = flatten_prompt(request);
		let body = GenerateRequest {
			contents: [Content {
				parts: [Part { text: &prompt }],
			}],
			generation_config: GenerationConfig {
				max_output_tokens: self.config.max_tokens,
			},
		};

		let builder = self
			.client
			.post(self.generate_url())
			.query(&[("key", secret.expose())])
			.json(&body);
		let response: GenerateResponse = execute(Provider::Google, builder).await?;

		let content = response
			.candidates
			.into_iter()
			.next()
			.and_then(|candidate| candidate.content)
			.and_then(|content| content.parts.into_iter().next())
			.and_then(|part| part.text);
		Ok(ChatResult::from_content(content, Provider::Google, &self.config.model))
	}
}
