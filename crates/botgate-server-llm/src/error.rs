// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider error types.
//!
//! None of these variants carry an upstream response body, a request URL or
//! the API key. Transport errors are built from `reqwest::Error::without_url`
//! because some providers take the key as a query parameter.

use botgate_server_auth::Provider;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
	/// The provider is a known variant with no adapter.
	#[error("provider {0} is not supported for chat")]
	Unsupported(Provider),

	#[error("unknown provider: {0}")]
	UnknownProvider(String),

	/// The provider answered with a non-success status.
	#[error("{provider} API error: {status_text}")]
	Call {
		provider: Provider,
		status_text: String,
	},

	#[error("{provider} request failed: {message}")]
	Transport { provider: Provider, message: String },

	#[error("{provider} request timed out")]
	Timeout { provider: Provider },

	#[error("{provider} returned an unreadable response: {message}")]
	InvalidResponse { provider: Provider, message: String },
}

impl ProviderError {
	/// Wrap a reqwest failure, stripping the request URL first.
	pub(crate) fn from_reqwest(provider: Provider, err: reqwest::Error) -> Self {
		let err = err.without_url();
		if err.is_timeout() {
			ProviderError::Timeout { provider }
		} else if err.is_decode() {
			ProviderError::InvalidResponse {
				provider,
				message: err.to_string(),
			}
		} else {
			ProviderError::Transport {
				provider,
				message: err.to_string(),
			}
		}
	}

	/// Describe a body parse failure by position only, never by content.
	pub(crate) fn from_json(provider: Provider, err: &serde_json::Error) -> Self {
		ProviderError::InvalidResponse {
			provider,
			message: format!(
				"{:?} error at line {} column {}",
				err.classify(),
				err.line(),
				err.column()
			),
		}
	}

	pub(crate) fn response_too_large(provider: Provider) -> Self {
		ProviderError::InvalidResponse {
			provider,
			message: format!(
				"response body exceeds {} bytes",
				crate::adapter::MAX_RESPONSE_BYTES
			),
		}
	}

	/// Returns true if the caller asked for something this gateway cannot do.
	pub fn is_client_error(&self) -> bool {
		matches!(
			self,
			ProviderError::Unsupported(_) | ProviderError::UnknownProvider(_)
		)
	}

	/// Returns the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		if self.is_client_error() {
			400
		} else {
			500
		}
	}
}
