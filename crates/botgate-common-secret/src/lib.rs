// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wrapper type for the sensitive values botgate handles.
//!
//! Three kinds of values flow through the gateway that must never reach a log
//! line, an error message or a response body: users' third-party provider API
//! keys (only ever in plaintext between decryption and the upstream call), the
//! process-wide cipher key, and the session signing key. All of them are held
//! as [`Secret<T>`], which
//!
//! - renders as `[REDACTED]` through `Debug`, `Display` and `Serialize`,
//! - zeroizes its memory on drop,
//! - only hands out the inner value through an explicit [`Secret::expose`].
//!
//! ```
//! use botgate_common_secret::SecretString;
//!
//! let provider_key = SecretString::from("sk-live-0123456789");
//! assert_eq!(format!("{provider_key}"), "[REDACTED]");
//! assert_eq!(provider_key.expose(), "sk-live-0123456789");
//! ```
//!
//! `tracing::Value` is sealed, so structured logging relies on the redacted
//! `Display` (`%secret`) and `Debug` (`?secret`) impls below.

use std::fmt;
use zeroize::Zeroize;

/// The redaction placeholder used in all output.
pub const REDACTED: &str = "[REDACTED]";

/// A wrapper for sensitive values that prevents accidental exposure.
///
/// There is no `Deref` impl; callers must go through [`Secret::expose`], which
/// keeps every plaintext access greppable.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// Secret strings: provider API keys, base64 cipher keys, signing keys.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Explicitly access the inner value.
	pub fn expose(&self) -> &T {
		&self.inner
	}

	/// Consume the wrapper and return a copy of the inner value.
	///
	/// The value is cloned rather than moved out so that the wrapper's own
	/// buffer is still zeroized when it drops.
	pub fn into_inner(self) -> T
	where
		T: Clone,
	{
		self.inner.clone()
	}
}

impl Secret<String> {
	/// Returns a new secret holding the inner string with surrounding
	/// whitespace removed.
	pub fn trimmed(&self) -> SecretString {
		Secret::new(self.inner.trim().to_string())
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Secret::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Secret::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

// =============================================================================
// Serde Integration
// =============================================================================

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	/// Always serializes as `"[REDACTED]"`, so a secret accidentally placed in
	/// a response DTO cannot leak.
	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	/// Request bodies carrying a provider key deserialize straight into a
	/// secret, so the plaintext is never held in a bare `String` field.
	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			let inner = T::deserialize(deserializer)?;
			Ok(Secret::new(inner))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	mod secret_type {
		use super::*;

		#[test]
		fn debug_is_redacted() {
			let secret = SecretString::from("sk-ant-api03-abcdef");
			let debug_output = format!("{secret:?}");

			assert!(!debug_output.contains("sk-ant-api03-abcdef"));
			assert_eq!(debug_output, "Secret(\"[REDACTED]\")");
		}

		#[test]
		fn display_is_redacted() {
			let secret = SecretString::from("sk-ant-api03-abcdef");
			assert_eq!(format!("{secret}"), REDACTED);
		}

		#[test]
		fn expose_returns_inner_value() {
			let secret = SecretString::from("AIzaSyExample");
			assert_eq!(secret.expose(), "AIzaSyExample");
		}

		#[test]
		fn into_inner_returns_owned_value() {
			let secret = SecretString::from("sk-123");
			assert_eq!(secret.into_inner(), "sk-123");
		}

		#[test]
		fn trimmed_strips_whitespace() {
			let secret = SecretString::from("  sk-123 \n");
			assert_eq!(secret.trimmed().expose(), "sk-123");
			assert!(SecretString::from("   ").trimmed().is_empty());
		}

		#[test]
		fn option_secret_debug_is_redacted() {
			let secret: Option<SecretString> = Some(SecretString::from("signing-key"));
			let debug = format!("{secret:?}");
			assert!(debug.contains(REDACTED));
			assert!(!debug.contains("signing-key"));
		}
	}

	#[cfg(feature = "serde")]
	mod serde_tests {
		use super::*;

		#[derive(serde::Serialize, serde::Deserialize)]
		struct CreateKey {
			name: String,
			api_key: SecretString,
		}

		#[test]
		fn serialize_is_redacted() {
			let body = CreateKey {
				name: "work".to_string(),
				api_key: SecretString::from("sk-live-secret"),
			};
			let json = serde_json::to_string(&body).unwrap();

			assert!(!json.contains("sk-live-secret"));
			assert!(json.contains(REDACTED));
		}

		#[test]
		fn deserialize_populates_secret() {
			let body: CreateKey =
				serde_json::from_str(r#"{"name":"work","api_key":"sk-live-secret"}"#).unwrap();
			assert_eq!(body.api_key.expose(), "sk-live-secret");
		}
	}

	mod property_tests {
		use super::*;

		proptest! {
			/// Quotes and brackets are excluded because they appear in the
			/// redacted rendering itself.
			#[test]
			fn debug_never_contains_secret(inner in "[a-zA-Z0-9!@#$%^&*_+=;:,.<>?/-]{3,50}") {
				prop_assume!(!inner.contains("REDACTED"));
				prop_assume!(!inner.contains("Secret"));

				let secret = Secret::new(inner.clone());
				let rendered = format!("{:?}", secret);
				prop_assert!(!rendered.contains(&inner));
			}

			#[test]
			fn display_never_contains_secret(inner in "[a-zA-Z0-9!@#$%^&*_+=;:,.<>?/-]{3,50}") {
				prop_assume!(!inner.contains("REDACTED"));

				let secret = Secret::new(inner.clone());
				let rendered = format!("{}", secret);
				prop_assert!(!rendered.contains(&inner));
			}

			#[test]
			fn expose_roundtrips(inner in ".*") {
				let secret = Secret::new(inner.clone());
				prop_assert_eq!(secret.expose(), &inner);
			}
		}
	}
}
