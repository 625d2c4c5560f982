// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared validation utilities for API handlers.
//!
//! Every function trims its input and returns the normalized value, so
//! handlers persist exactly what was validated.

use botgate_common_secret::SecretString;
use botgate_server_auth::MIN_PASSWORD_LENGTH;

/// Longest accepted bot name, in characters.
pub const MAX_BOT_NAME_LEN: usize = 80;

/// Longest accepted bot description, in characters.
pub const MAX_BOT_DESCRIPTION_LEN: usize = 500;

/// A request field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
	pub error: String,
	pub message: String,
}

impl ValidationError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			error: "validation_error".to_string(),
			message: message.into(),
		}
	}
}

/// Sanitize an email address by trimming whitespace.
pub fn sanitize_email(email: &str) -> String {
	email.trim().to_string()
}

/// Require an email and a password, returning the trimmed email and the
/// password.
pub fn require_login_fields(
	email: &str,
	password: Option<SecretString>,
) -> Result<(String, SecretString), ValidationError> {
	let email = sanitize_email(email);
	match password {
		Some(password) if !email.is_empty() && !password.is_empty() => Ok((email, password)),
		_ => Err(ValidationError::new("Email and password are required")),
	}
}

/// Enforce the minimum password length, counted in characters.
pub fn validate_password(password: &SecretString) -> Result<(), ValidationError> {
	if password.expose().chars().count() < MIN_PASSWORD_LENGTH {
		return Err(ValidationError::new(format!(
			"Password must be at least {MIN_PASSWORD_LENGTH} characters"
		)));
	}
	Ok(())
}

/// Trim and bound-check a bot name.
pub fn validate_bot_name(name: &str) -> Result<String, ValidationError> {
	let name = name.trim();
	if name.is_empty() {
		return Err(ValidationError::new("Bot name is required"));
	}
	if name.chars().count() > MAX_BOT_NAME_LEN {
		return Err(ValidationError::new(format!(
			"Bot name must be {MAX_BOT_NAME_LEN} characters or fewer"
		)));
	}
	Ok(name.to_string())
}

/// Trim and bound-check a bot description. Blank descriptions become `None`.
pub fn normalize_description(
	description: Option<&str>,
) -> Result<Option<String>, ValidationError> {
	let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
		return Ok(None);
	};
	if description.chars().count() > MAX_BOT_DESCRIPTION_LEN {
		return Err(ValidationError::new(format!(
			"Description must be {MAX_BOT_DESCRIPTION_LEN} characters or fewer"
		)));
	}
	Ok(Some(description.to_string()))
}

/// Treat a blank credential reference as no reference.
pub fn normalize_reference(reference: Option<&str>) -> Option<&str> {
	reference.map(str::trim).filter(|r| !r.is_empty())
}
