// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Carrying the session token over HTTP.
//!
//! This module provides:
//! - [`AuthConfig`] - cookie naming and security attributes, dev mode flag
//! - Helpers for extracting the session token from a request
//! - Builders for the `Set-Cookie` values issued at login and logout
//!
//! # Token Transport
//!
//! ```text
//! Request → Cookie `session` ─┬─> SessionAuthenticator::verify → Identity
//!        → Authorization: Bearer ┘   (fallback for non-browser clients)
//! ```
//!
//! The cookie is `HttpOnly` and `SameSite=Lax`, and `Secure` whenever the
//! deployment is production, so the token is never readable by page scripts.

use chrono::Duration;
use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use tracing::instrument;

/// Default name for the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Configuration for session transport and account creation.
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Dev mode allows ephemeral keys. It never bypasses authentication.
	pub dev_mode: bool,
	/// Name of the session cookie.
	pub session_cookie_name: String,
	/// Add the `Secure` attribute to session cookies.
	pub secure_cookies: bool,
	/// Disable new user signups (existing users can still log in).
	pub signups_disabled: bool,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			dev_mode: false,
			session_cookie_name: SESSION_COOKIE_NAME.to_string(),
			secure_cookies: true,
			signups_disabled: false,
		}
	}
}

impl AuthConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_dev_mode(mut self, enabled: bool) -> Self {
		self.dev_mode = enabled;
		self
	}

	pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
		self.session_cookie_name = name.into();
		self
	}

	pub fn with_secure_cookies(mut self, secure: bool) -> Self {
		self.secure_cookies = secure;
		self
	}

	pub fn with_signups_disabled(mut self, disabled: bool) -> Self {
		self.signups_disabled = disabled;
		self
	}
}

/// Extract the value of the cookie named `cookie_name` from the Cookie header.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let cookie = cookie.trim();
			let (name, value) = cookie.split_once('=')?;

			if name == cookie_name && !value.is_empty() {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// Extract bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(|token| token.to_string())
}

/// Session tokens carried by a request, in the order they should be tried:
/// the session cookie, then a bearer token.
///
/// Callers verify each in turn, so a stale cookie does not shadow a valid
/// bearer token.
pub fn session_token_candidates(headers: &HeaderMap, config: &AuthConfig) -> Vec<String> {
	extract_session_cookie_with_name(headers, &config.session_cookie_name)
		.into_iter()
		.chain(extract_bearer_token(headers))
		.collect()
}

/// `Set-Cookie` value that installs `token` as the session cookie for `ttl`.
///
/// Pass the issuing authenticator's TTL so the cookie and token expire
/// together.
pub fn session_cookie(config: &AuthConfig, token: &str, ttl: Duration) -> String {
	let max_age = ttl.num_seconds().max(0);
	let mut cookie = format!(
		"{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}",
		config.session_cookie_name, token
	);
	if config.secure_cookies {
		cookie.push_str("; Secure");
	}
	cookie
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn clear_session_cookie(config: &AuthConfig) -> String {
	let mut cookie = format!(
		"{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
		config.session_cookie_name
	);
	if config.secure_cookies {
		cookie.push_str("; Secure");
	}
	cookie
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;

	mod auth_config {
		use super::*;

		#[test]
		fn default_is_secure_and_not_dev() {
			let config = AuthConfig::default();
			assert!(!config.dev_mode);
			assert!(config.secure_cookies);
			assert_eq!(config.session_cookie_name, "session");
		}

		#[test]
		fn builders_set_fields() {
			let config = AuthConfig::new()
				.with_dev_mode(true)
				.with_session_cookie_name("sid")
				.with_secure_cookies(false)
				.with_signups_disabled(true);
			assert!(config.dev_mode);
			assert_eq!(config.session_cookie_name, "sid");
			assert!(!config.secure_cookies);
			assert!(config.signups_disabled);
		}
	}

	mod extract_session_cookie {
		use super::*;

		#[test]
		fn extracts_session_from_multiple_cookies() {
			let mut headers = HeaderMap::new();
			headers.insert(
				COOKIE,
				HeaderValue::from_static("theme=dark; session=xyz789; lang=en"),
			);

			assert_eq!(
				extract_session_cookie_with_name(&headers, "session"),
				Some("xyz789".to_string())
			);
		}

		#[test]
		fn does_not_match_cookie_with_name_prefix() {
			let mut headers = HeaderMap::new();
			headers.insert(COOKIE, HeaderValue::from_static("session_old=abc"));
			assert_eq!(extract_session_cookie_with_name(&headers, "session"), None);
		}

		#[test]
		fn empty_cookie_value_is_absent() {
			let mut headers = HeaderMap::new();
			headers.insert(COOKIE, HeaderValue::from_static("session="));
			assert_eq!(extract_session_cookie_with_name(&headers, "session"), None);
		}

		#[test]
		fn returns_none_when_no_cookie_header() {
			assert_eq!(
				extract_session_cookie_with_name(&HeaderMap::new(), "session"),
				None
			);
		}
	}

	mod extract_token {
		use super::*;

		#[test]
		fn extracts_bearer_token() {
			let mut headers = HeaderMap::new();
			headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer eyJ.abc.def"));
			assert_eq!(extract_bearer_token(&headers), Some("eyJ.abc.def".to_string()));
		}

		#[test]
		fn ignores_other_schemes() {
			let mut headers = HeaderMap::new();
			headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
			assert_eq!(extract_bearer_token(&headers), None);
		}

		#[test]
		fn cookie_is_tried_before_bearer() {
			let mut headers = HeaderMap::new();
			headers.insert(COOKIE, HeaderValue::from_static("session=from-cookie"));
			headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
			assert_eq!(
				session_token_candidates(&headers, &AuthConfig::default()),
				vec!["from-cookie".to_string(), "from-header".to_string()]
			);
		}

		#[test]
		fn bearer_alone_is_a_candidate() {
			let mut headers = HeaderMap::new();
			headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
			assert_eq!(
				session_token_candidates(&headers, &AuthConfig::default()),
				vec!["from-header".to_string()]
			);
		}

		#[test]
		fn no_credentials_means_no_candidates() {
			assert!(session_token_candidates(&HeaderMap::new(), &AuthConfig::default()).is_empty());
		}
	}

	mod cookies {
		use super::*;

		#[test]
		fn session_cookie_has_security_attributes() {
			let cookie = session_cookie(&AuthConfig::default(), "tok", Duration::hours(24));
			assert!(cookie.starts_with("session=tok;"));
			assert!(cookie.contains("HttpOnly"));
			assert!(cookie.contains("SameSite=Lax"));
			assert!(cookie.contains("Path=/"));
			assert!(cookie.contains("Max-Age=86400"));
			assert!(cookie.ends_with("; Secure"));
		}

		#[test]
		fn insecure_cookie_omits_secure_attribute() {
			let config = AuthConfig::default().with_secure_cookies(false);
			assert!(!session_cookie(&config, "tok", Duration::hours(24)).contains("Secure"));
		}

		#[test]
		fn max_age_follows_ttl() {
			let cookie = session_cookie(&AuthConfig::default(), "tok", Duration::minutes(30));
			assert!(cookie.contains("Max-Age=1800;"));
		}

		#[test]
		fn clear_cookie_expires_immediately() {
			let cookie = clear_session_cookie(&AuthConfig::default());
			assert!(cookie.starts_with("session=;"));
			assert!(cookie.contains("Max-Age=0"));
		}
	}
}
