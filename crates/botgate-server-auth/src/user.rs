// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User accounts and the per-request verified identity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::UserId;

/// A registered account.
#[derive(Clone, Serialize)]
pub struct User {
	pub id: UserId,
	pub email: String,
	/// Argon2id PHC string. Never serialized into API responses.
	#[serde(skip_serializing)]
	pub password_hash: String,
	pub created_at: DateTime<Utc>,
}

impl User {
	pub fn new(email: impl Into<String>, password_hash: String) -> Self {
		Self {
			id: UserId::generate(),
			email: email.into(),
			password_hash,
			created_at: Utc::now(),
		}
	}

	pub fn identity(&self) -> Identity {
		Identity {
			user_id: self.id,
			email: self.email.clone(),
		}
	}
}

impl std::fmt::Debug for User {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("User")
			.field("id", &self.id)
			.field("email", &self.email)
			.field("created_at", &self.created_at)
			.finish_non_exhaustive()
	}
}

/// The subject a verified session token speaks for.
///
/// Only ever produced by [`crate::SessionAuthenticator::verify`] or from a
/// freshly authenticated [`User`]; it lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
	pub user_id: UserId,
	pub email: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn debug_omits_password_hash() {
		let user = User::new("a@example.com", "$argon2id$secret-hash".to_string());
		let debug = format!("{user:?}");
		assert!(!debug.contains("secret-hash"));
		assert!(debug.contains("a@example.com"));
	}

	#[test]
	fn serialize_omits_password_hash() {
		let user = User::new("a@example.com", "$argon2id$secret-hash".to_string());
		let json = serde_json::to_string(&user).unwrap();
		assert!(!json.contains("password_hash"));
	}

	#[test]
	fn identity_carries_id_and_email() {
		let user = User::new("a@example.com", String::new());
		let identity = user.identity();
		assert_eq!(identity.user_id, user.id);
		assert_eq!(identity.email, "a@example.com");
	}
}
