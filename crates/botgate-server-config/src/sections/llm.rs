// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Upstream LLM provider configuration.
//!
//! These settings are shared by every user's calls. API keys are never
//! configured here; each call uses the calling user's stored credential.

use serde::Deserialize;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TEMPERATURE: f32 = 0.7;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GOOGLE_MODEL: &str = "gemini-pro";

/// LLM configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
	/// Total timeout for one upstream call. There is no retry.
	pub timeout_secs: u64,
	pub max_tokens: u32,
	pub temperature: f32,
	pub openai_base_url: String,
	pub openai_model: String,
	pub anthropic_base_url: String,
	pub anthropic_model: String,
	pub anthropic_version: String,
	pub google_base_url: String,
	pub google_model: String,
}

impl Default for LlmConfig {
	fn default() -> Self {
		LlmConfigLayer::default().finalize()
	}
}

/// LLM configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LlmConfigLayer {
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(default)]
	pub max_tokens: Option<u32>,
	#[serde(default)]
	pub temperature: Option<f32>,
	#[serde(default)]
	pub openai_base_url: Option<String>,
	#[serde(default)]
	pub openai_model: Option<String>,
	#[serde(default)]
	pub anthropic_base_url: Option<String>,
	#[serde(default)]
	pub anthropic_model: Option<String>,
	#[serde(default)]
	pub anthropic_version: Option<String>,
	#[serde(default)]
	pub google_base_url: Option<String>,
	#[serde(default)]
	pub google_model: Option<String>,
}

impl LlmConfigLayer {
	pub fn merge(&mut self, other: LlmConfigLayer) {
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.max_tokens.is_some() {
			self.max_tokens = other.max_tokens;
		}
		if other.temperature.is_some() {
			self.temperature = other.temperature;
		}
		if other.openai_base_url.is_some() {
			self.openai_base_url = other.openai_base_url;
		}
		if other.openai_model.is_some() {
			self.openai_model = other.openai_model;
		}
		if other.anthropic_base_url.is_some() {
			self.anthropic_base_url = other.anthropic_base_url;
		}
		if other.anthropic_model.is_some() {
			self.anthropic_model = other.anthropic_model;
		}
		if other.anthropic_version.is_some() {
			self.anthropic_version = other.anthropic_version;
		}
		if other.google_base_url.is_some() {
			self.google_base_url = other.google_base_url;
		}
		if other.google_model.is_some() {
			self.google_model = other.google_model;
		}
	}

	pub fn finalize(self) -> LlmConfig {
		LlmConfig {
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
			max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
			temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
			openai_base_url: self
				.openai_base_url
				.unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
			openai_model: self
				.openai_model
				.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
			anthropic_base_url: self
				.anthropic_base_url
				.unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
			anthropic_model: self
				.anthropic_model
				.unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
			anthropic_version: self
				.anthropic_version
				.unwrap_or_else(|| DEFAULT_ANTHROPIC_VERSION.to_string()),
			google_base_url: self
				.google_base_url
				.unwrap_or_else(|| DEFAULT_GOOGLE_BASE_URL.to_string()),
			google_model: self
				.google_model
				.unwrap_or_else(|| DEFAULT_GOOGLE_MODEL.to_string()),
		}
	}
}
