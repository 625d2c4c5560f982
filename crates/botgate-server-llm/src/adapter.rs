// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use botgate_common_secret::SecretString;
use botgate_server_auth::Provider;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::types::{ChatRequest, ChatResult};

/// Upper bound on an upstream response body. A single-turn completion capped
/// by `max_tokens` is far smaller.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// One upstream chat provider.
///
/// Implementations make exactly one HTTP request per `send` and do not
/// retain the secret after returning.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
	fn provider(&self) -> Provider;

	/// The model name sent upstream and echoed in [`ChatResult::model`].
	fn model(&self) -> &str;

	async fn send(
		&self,
		secret: &SecretString,
		request: &ChatRequest,
	) -> Result<ChatResult, ProviderError>;
}

/// Send a prepared request and decode a successful JSON body.
///
/// A non-success status becomes [`ProviderError::Call`] carrying only the
/// canonical reason phrase. The response body is read only on success, and
/// never past [`MAX_RESPONSE_BYTES`].
pub(crate) async fn execute<T: DeserializeOwned>(
	provider: Provider,
	builder: RequestBuilder,
) -> Result<T, ProviderError> {
	let mut response = builder
		.send()
		.await
		.map_err(|e| ProviderError::from_reqwest(provider, e))?;

	let status = response.status();
	if !status.is_success() {
		warn!(%provider, status = status.as_u16(), "provider returned error status");
		return Err(ProviderError::Call {
			provider,
			status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
		});
	}
	debug!(%provider, status = status.as_u16(), "provider responded");

	if response
		.content_length()
		.is_some_and(|len| len > MAX_RESPONSE_BYTES as u64)
	{
		return Err(ProviderError::response_too_large(provider));
	}

	let mut body = Vec::new();
	while let Some(chunk) = response
		.chunk()
		.await
		.map_err(|e| ProviderError::from_reqwest(provider, e))?
	{
		if body.len() + chunk.len() > MAX_RESPONSE_BYTES {
			return Err(ProviderError::response_too_large(provider));
		}
		body.extend_from_slice(&chunk);
	}
	serde_json::from_slice(&body).map_err(|e| ProviderError::from_json(provider, &e))
}
