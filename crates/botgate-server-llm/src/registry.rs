// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Closed provider dispatch table.

use std::collections::HashMap;
use std::sync::Arc;

use botgate_server_auth::Provider;
use reqwest::Client;
use tracing::info;

use crate::adapter::ProviderAdapter;
use crate::anthropic::{AnthropicAdapter, AnthropicConfig};
use crate::error::ProviderError;
use crate::google::{GoogleAdapter, GoogleConfig};
use crate::openai::{OpenAiAdapter, OpenAiConfig};

/// Maps each [`Provider`] to its adapter. Built once at startup and shared
/// read-only.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
	adapters: HashMap<Provider, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// The three supported adapters sharing one HTTP client.
	pub fn standard(
		client: Client,
		openai: OpenAiConfig,
		anthropic: AnthropicConfig,
		google: GoogleConfig,
	) -> Self {
		let registry = Self::new()
			.with_adapter(Arc::new(OpenAiAdapter::new(client.clone(), openai)))
			.with_adapter(Arc::new(AnthropicAdapter::new(client.clone(), anthropic)))
			.with_adapter(Arc::new(GoogleAdapter::new(client, google)));
		info!(providers = ?registry.providers(), "provider registry ready");
		registry
	}

	/// Register `adapter` under its own provider, replacing any previous one.
	pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
		self.adapters.insert(adapter.provider(), adapter);
		self
	}

	/// # Errors
	/// [`ProviderError::Unsupported`] if no adapter is registered.
	pub fn select(&self, provider: Provider) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
		self
			.adapters
			.get(&provider)
			.cloned()
			.ok_or(ProviderError::Unsupported(provider))
	}

	/// # Errors
	/// [`ProviderError::UnknownProvider`] if `name` is not a provider at all,
	/// otherwise as [`select`](Self::select).
	pub fn select_by_name(&self, name: &str) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
		let provider = name
			.parse::<Provider>()
			.map_err(|_| ProviderError::UnknownProvider(name.to_string()))?;
		self.select(provider)
	}

	pub fn supports(&self, provider: Provider) -> bool {
		self.adapters.contains_key(&provider)
	}

	/// Registered providers in declaration order.
	pub fn providers(&self) -> Vec<Provider> {
		Provider::all()
			.iter()
			.copied()
			.filter(|p| self.supports(*p))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn registry() -> ProviderRegistry {
		ProviderRegistry::standard(
			Client::new(),
			OpenAiConfig::default(),
			AnthropicConfig::default(),
			GoogleConfig::default(),
		)
	}

	#[test]
	fn standard_covers_three_providers() {
		let registry = registry();
		assert_eq!(
			registry.providers(),
			vec![Provider::OpenAi, Provider::Anthropic, Provider::Google]
		);
		for provider in registry.providers() {
			let adapter = registry.select(provider).unwrap();
			assert_eq!(adapter.provider(), provider);
		}
	}

	#[test]
	fn azure_and_custom_are_unsupported() {
		let registry = registry();
		for provider in [Provider::Azure, Provider::Custom] {
			assert!(matches!(
				registry.select(provider),
				Err(ProviderError::Unsupported(p)) if p == provider
			));
		}
	}

	#[test]
	fn select_by_name_distinguishes_unknown_from_unsupported() {
		let registry = registry();
		assert!(registry.select_by_name("openai").is_ok());
		assert!(matches!(
			registry.select_by_name("azure"),
			Err(ProviderError::Unsupported(Provider::Azure))
		));
		assert!(matches!(
			registry.select_by_name("mistral"),
			Err(ProviderError::UnknownProvider(name)) if name == "mistral"
		));
	}

	#[test]
	fn models_come_from_config() {
		let registry = ProviderRegistry::standard(
			Client::new(),
			OpenAiConfig::default().with_model("gpt-4o-mini"),
			AnthropicConfig::default(),
			GoogleConfig::default().with_model("gemini-1.5-flash"),
		);
		assert_eq!(registry.select(Provider::OpenAi).unwrap().model(), "gpt-4o-mini");
		assert_eq!(
			registry.select(Provider::Google).unwrap().model(),
			"gemini-1.5-flash"
		);
	}
}
