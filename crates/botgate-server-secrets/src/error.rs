// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the credential vault.

use botgate_server_db::DbError;
use thiserror::Error;

/// Result type alias for vault operations.
pub type SecretsResult<T> = Result<T, SecretsError>;

/// Errors that can occur during vault operations.
///
/// No variant ever carries plaintext key material.
#[derive(Debug, Error)]
pub enum SecretsError {
	// =========================================================================
	// Configuration Errors
	// =========================================================================
	#[error("configuration error: {0}")]
	Configuration(String),

	#[error("cipher key not configured")]
	CipherKeyNotConfigured,

	#[error("invalid key size: expected {expected}, got {actual}")]
	InvalidKeySize { expected: usize, actual: usize },

	// =========================================================================
	// Encryption Errors
	// =========================================================================
	#[error("encryption failed: {0}")]
	Encryption(String),

	/// Tampered data, wrong key, unknown version or malformed encoding.
	#[error("decryption failed: {0}")]
	Decryption(String),

	// =========================================================================
	// Credential Errors
	// =========================================================================
	#[error("{0}")]
	Validation(String),

	/// Absent, or owned by someone else.
	#[error("credential not found")]
	CredentialNotFound,

	// =========================================================================
	// Infrastructure Errors
	// =========================================================================
	#[error("database error: {0}")]
	Database(DbError),

	#[error("internal error: {0}")]
	Internal(String),
}

impl From<DbError> for SecretsError {
	fn from(e: DbError) -> Self {
		match e {
			DbError::NotFound(_) => SecretsError::CredentialNotFound,
			other => SecretsError::Database(other),
		}
	}
}

impl SecretsError {
	/// Returns true if this error should be logged at error level.
	pub fn is_internal(&self) -> bool {
		matches!(
			self,
			SecretsError::Configuration(_)
				| SecretsError::CipherKeyNotConfigured
				| SecretsError::InvalidKeySize { .. }
				| SecretsError::Encryption(_)
				| SecretsError::Decryption(_)
				| SecretsError::Database(_)
				| SecretsError::Internal(_)
		)
	}

	/// Returns the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			SecretsError::Validation(_) => 400,
			SecretsError::CredentialNotFound => 404,
			SecretsError::Configuration(_)
			| SecretsError::CipherKeyNotConfigured
			| SecretsError::InvalidKeySize { .. }
			| SecretsError::Encryption(_)
			| SecretsError::Decryption(_)
			| SecretsError::Database(_)
			| SecretsError::Internal(_) => 500,
		}
	}
}
