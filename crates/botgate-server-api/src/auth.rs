// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use botgate_common_secret::SecretString;
use botgate_server_auth::Identity;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Request to create an account.
///
/// Missing fields deserialize as empty so the handler can answer with a
/// validation error rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegisterRequest {
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = Password))]
	pub password: Option<SecretString>,
}

/// Request to sign in.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = Password))]
	pub password: Option<SecretString>,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserSummary {
	pub id: String,
	pub email: String,
}

impl From<&Identity> for UserSummary {
	fn from(identity: &Identity) -> Self {
		Self {
			id: identity.user_id.to_string(),
			email: identity.email.clone(),
		}
	}
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthSuccessResponse {
	pub success: bool,
	pub user: UserSummary,
}

impl AuthSuccessResponse {
	pub fn new(user: UserSummary) -> Self {
		Self {
			success: true,
			user,
		}
	}
}

/// Error response for auth operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthErrorResponse {
	pub error: String,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_deserialize_as_empty() {
		let req: RegisterRequest = serde_json::from_str("{}").unwrap();
		assert!(req.email.is_empty());
		assert!(req.password.is_none());
	}

	#[test]
	fn password_is_redacted_in_debug() {
		let req: LoginRequest =
			serde_json::from_str(r#"{"email":"a@b.c","password":"hunter22"}"#).unwrap();
		assert_eq!(req.password.as_ref().unwrap().expose(), "hunter22");
		assert!(!format!("{req:?}").contains("hunter22"));
	}
}
