// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and authorization error types.

use thiserror::Error;

/// Errors that can occur during authentication and authorization.
#[derive(Debug, Error)]
pub enum AuthError {
	// =========================================================================
	// Authentication Errors
	// =========================================================================
	/// No valid session accompanied the request.
	#[error("authentication required")]
	AuthenticationRequired,

	/// Email or password did not match. Deliberately does not say which.
	#[error("invalid credentials")]
	InvalidCredentials,

	// =========================================================================
	// User Errors
	// =========================================================================
	#[error("email already in use by another account")]
	EmailAlreadyInUse,

	#[error("signups are disabled")]
	SignupsDisabled,

	// =========================================================================
	// Authorization Errors
	// =========================================================================
	/// The resource was not found, or exists but belongs to someone else.
	#[error("resource not found")]
	ResourceNotFound,

	// =========================================================================
	// Infrastructure Errors
	// =========================================================================
	#[error("password hashing error: {0}")]
	HashingError(String),

	#[error("internal error: {0}")]
	Internal(String),

	#[error("configuration error: {0}")]
	Configuration(String),
}

impl AuthError {
	/// Returns true if this error should be logged at error level.
	pub fn is_internal(&self) -> bool {
		matches!(
			self,
			AuthError::HashingError(_) | AuthError::Internal(_) | AuthError::Configuration(_)
		)
	}

	/// Returns the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			AuthError::AuthenticationRequired | AuthError::InvalidCredentials => 401,
			AuthError::SignupsDisabled => 403,
			AuthError::ResourceNotFound => 404,
			AuthError::EmailAlreadyInUse => 409,
			AuthError::HashingError(_) | AuthError::Internal(_) | AuthError::Configuration(_) => {
				500
			}
		}
	}
}
