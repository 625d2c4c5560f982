// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use botgate_server_auth::Provider;

/// Returned as the reply text when a provider answers successfully but with
/// no usable content.
pub const FALLBACK_TEXT: &str = "Could not get a response from the model.";

/// A single-turn chat: one system prompt and one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
	pub system_prompt: String,
	pub user_message: String,
}

impl ChatRequest {
	pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
		Self {
			system_prompt: system_prompt.into(),
			user_message: user_message.into(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResult {
	pub text: String,
	pub provider: Provider,
	pub model: String,
}

impl ChatResult {
	/// Build a result, substituting [`FALLBACK_TEXT`] for missing or empty
	/// content.
	pub(crate) fn from_content(content: Option<String>, provider: Provider, model: &str) -> Self {
		let text = content
			.filter(|text| !text.is_empty())
			.unwrap_or_else(|| FALLBACK_TEXT.to_string());
		Self {
			text,
			provider,
			model: model.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_content_falls_back() {
		let result = ChatResult::from_content(Some(String::new()), Provider::OpenAi, "m");
		assert_eq!(result.text, FALLBACK_TEXT);

		let result = ChatResult::from_content(None, Provider::Google, "m");
		assert_eq!(result.text, FALLBACK_TEXT);
	}

	#[test]
	fn content_is_kept_verbatim() {
		let result = ChatResult::from_content(Some("  hi  ".into()), Provider::Anthropic, "claude");
		assert_eq!(result.text, "  hi  ");
		assert_eq!(result.model, "claude");
		assert_eq!(result.provider, Provider::Anthropic);
	}
}
