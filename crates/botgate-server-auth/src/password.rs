// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing for email/password accounts.

use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use botgate_common_secret::SecretString;
use std::sync::OnceLock;
use tracing::instrument;

use crate::argon2_config::argon2_instance;
use crate::error::AuthError;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash a password into an Argon2id PHC string with a fresh random salt.
#[instrument(skip_all)]
pub fn hash_password(password: &SecretString) -> Result<String, AuthError> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.expose().as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| AuthError::HashingError(e.to_string()))
}

/// Check a password against a stored PHC string.
///
/// A malformed stored hash is treated as a mismatch.
#[instrument(skip_all)]
pub fn verify_password(password: &SecretString, stored_hash: &str) -> bool {
	let parsed = match PasswordHash::new(stored_hash) {
		Ok(parsed) => parsed,
		Err(e) => {
			tracing::warn!(error = %e, "stored password hash is malformed");
			return false;
		}
	};
	argon2_instance()
		.verify_password(password.expose().as_bytes(), &parsed)
		.is_ok()
}

/// A valid Argon2id hash of a throwaway password, computed once per process.
fn dummy_hash() -> Option<&'static str> {
	static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
	DUMMY_HASH
		.get_or_init(|| hash_password(&SecretString::from("botgate-dummy-password")).ok())
		.as_deref()
}

/// Spend the same Argon2 work as [`verify_password`] for an account that does
/// not exist, so login latency does not reveal which emails are registered.
///
/// Always returns `false`.
#[instrument(skip_all)]
pub fn verify_password_for_unknown_user(password: &SecretString) -> bool {
	if let Some(hash) = dummy_hash() {
		let _ = verify_password(password, hash);
	}
	false
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hash_then_verify_accepts_same_password() {
		let password = SecretString::from("hunter22");
		let hash = hash_password(&password).unwrap();

		assert!(hash.starts_with("$argon2id$"));
		assert!(verify_password(&password, &hash));
	}

	#[test]
	fn verify_rejects_wrong_password() {
		let hash = hash_password(&SecretString::from("hunter22")).unwrap();
		assert!(!verify_password(&SecretString::from("hunter23"), &hash));
	}

	#[test]
	fn hashes_are_salted() {
		let password = SecretString::from("hunter22");
		let first = hash_password(&password).unwrap();
		let second = hash_password(&password).unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn hash_does_not_contain_password() {
		let hash = hash_password(&SecretString::from("plaintext-pw")).unwrap();
		assert!(!hash.contains("plaintext-pw"));
	}

	#[test]
	fn malformed_stored_hash_is_a_mismatch() {
		assert!(!verify_password(&SecretString::from("x"), "not-a-phc-string"));
		assert!(!verify_password(&SecretString::from("x"), ""));
	}

	#[test]
	fn unknown_user_verification_always_fails() {
		assert!(!verify_password_for_unknown_user(&SecretString::from(
			"botgate-dummy-password"
		)));
		assert!(!verify_password_for_unknown_user(&SecretString::from("hunter22")));
	}

	#[test]
	fn dummy_hash_uses_the_same_algorithm() {
		let hash = dummy_hash().unwrap();
		assert!(hash.starts_with("$argon2id$"));
	}
}
