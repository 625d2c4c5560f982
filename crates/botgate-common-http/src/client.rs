// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP client construction with a consistent User-Agent header.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Creates a new HTTP client builder with the standard botgate User-Agent header.
///
/// Use this when you need to customize the client beyond a timeout.
///
/// # Example
/// ```ignore
/// let client = botgate_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a new HTTP client with a total request timeout and the standard
/// User-Agent.
///
/// The timeout covers connect, send and reading the full response body.
pub fn new_client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	let client = builder().timeout(timeout).build()?;
	tracing::debug!(timeout_secs = timeout.as_secs(), "built outbound HTTP client");
	Ok(client)
}

/// Returns the standard botgate User-Agent string.
///
/// Format: `botgate/{crate_version}`
pub fn user_agent() -> String {
	format!("botgate/{}", env!("CARGO_PKG_VERSION"))
}
