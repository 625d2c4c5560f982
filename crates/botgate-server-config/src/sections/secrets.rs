// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server-held secrets: the credential cipher key and session signing key.
//!
//! These come only from the environment (or `*_FILE`), never from TOML.

use botgate_common_secret::SecretString;

use crate::env::load_secret_env;
use crate::error::ConfigError;

pub const CIPHER_KEY_VAR: &str = "BOTGATE_SERVER_CIPHER_KEY";
pub const SESSION_SECRET_VAR: &str = "BOTGATE_SERVER_SESSION_SECRET";

/// Optional until validated. `None` is only accepted in dev mode, where the
/// server generates ephemeral keys.
#[derive(Debug, Clone, Default)]
pub struct SecretsConfig {
	/// Base64 of a 32-byte AES-256-GCM key.
	pub cipher_key: Option<SecretString>,
	/// HMAC key for session tokens.
	pub session_secret: Option<SecretString>,
}

impl SecretsConfig {
	pub fn from_env() -> Result<Self, ConfigError> {
		Ok(Self {
			cipher_key: load_secret_env(CIPHER_KEY_VAR)
				.map_err(|e| ConfigError::Secret(e.to_string()))?,
			session_secret: load_secret_env(SESSION_SECRET_VAR)
				.map_err(|e| ConfigError::Secret(e.to_string()))?,
		})
	}
}
