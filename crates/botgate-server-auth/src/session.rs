// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stateless session tokens.
//!
//! A session token is an HS256-signed JWT carrying `{sub, email, iat, exp}`.
//! The server keeps no session table: a token is valid exactly when its
//! signature verifies under the process signing key and `now < exp`.
//!
//! [`SessionAuthenticator::verify`] deliberately collapses every failure
//! (malformed, wrong key, wrong algorithm, expired, bad subject) into `None`.
//! The reason is logged at debug level and never reaches the caller.

use std::collections::HashSet;
use std::fmt;

use botgate_common_secret::SecretString;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::AuthError;
use crate::types::UserId;
use crate::user::Identity;

/// Lifetime of a session token.
pub const SESSION_EXPIRY_HOURS: i64 = 24;

/// Minimum length in bytes of the session signing key.
pub const MIN_SIGNING_KEY_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
	/// Subject: the user id as a UUID string.
	sub: String,
	email: String,
	/// Issued at (seconds since epoch).
	iat: i64,
	/// Expiry (seconds since epoch).
	exp: i64,
}

/// Issues and verifies session tokens under one process-wide signing key.
pub struct SessionAuthenticator {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
	ttl: Duration,
}

impl SessionAuthenticator {
	/// Build an authenticator from the configured signing key.
	///
	/// Fails if the key is shorter than [`MIN_SIGNING_KEY_LEN`] bytes.
	pub fn new(signing_key: &SecretString) -> Result<Self, AuthError> {
		let key = signing_key.expose().as_bytes();
		if key.len() < MIN_SIGNING_KEY_LEN {
			return Err(AuthError::Configuration(format!(
				"session signing key must be at least {MIN_SIGNING_KEY_LEN} bytes"
			)));
		}

		let mut validation = Validation::new(Algorithm::HS256);
		// Expiry is checked against an explicit clock in verify_at.
		validation.validate_exp = false;
		validation.leeway = 0;
		validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

		Ok(Self {
			encoding_key: EncodingKey::from_secret(key),
			decoding_key: DecodingKey::from_secret(key),
			validation,
			ttl: Duration::hours(SESSION_EXPIRY_HOURS),
		})
	}

	/// Override the token lifetime.
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = ttl;
		self
	}

	/// Token lifetime; session cookies use it as their `Max-Age`.
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Issue a token for `user_id` valid from now for the configured lifetime.
	pub fn issue(&self, user_id: &UserId, email: &str) -> Result<String, AuthError> {
		self.issue_at(user_id, email, Utc::now())
	}

	/// Issue a token as if the current time were `now`.
	#[instrument(skip(self, email), fields(user_id = %user_id))]
	pub fn issue_at(
		&self,
		user_id: &UserId,
		email: &str,
		now: DateTime<Utc>,
	) -> Result<String, AuthError> {
		let claims = SessionClaims {
			sub: user_id.to_string(),
			email: email.to_string(),
			iat: now.timestamp(),
			exp: (now + self.ttl).timestamp(),
		};

		let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
			.map_err(|e| AuthError::Internal(format!("failed to sign session token: {e}")))?;

		debug!(exp = claims.exp, "issued session token");
		Ok(token)
	}

	/// Verify a token against the current time.
	pub fn verify(&self, token: &str) -> Option<Identity> {
		self.verify_at(token, Utc::now())
	}

	/// Verify a token as if the current time were `now`.
	///
	/// Returns `None` for every kind of failure.
	#[instrument(skip_all)]
	pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<Identity> {
		if token.is_empty() {
			return None;
		}

		let data = match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
			Ok(data) => data,
			Err(e) => {
				debug!(reason = ?e.kind(), "session token rejected");
				return None;
			}
		};

		if now.timestamp() >= data.claims.exp {
			debug!(exp = data.claims.exp, "session token expired");
			return None;
		}

		let Some(user_id) = UserId::parse(&data.claims.sub) else {
			debug!("session token subject is not a user id");
			return None;
		};

		Some(Identity {
			user_id,
			email: data.claims.email,
		})
	}
}

impl fmt::Debug for SessionAuthenticator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionAuthenticator")
			.field("signing_key", &botgate_common_secret::REDACTED)
			.field("ttl", &self.ttl)
			.finish()
	}
}
