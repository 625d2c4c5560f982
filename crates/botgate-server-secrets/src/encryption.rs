// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symmetric sealing of provider API keys.
//!
//! Uses AES-256-GCM under a single process-wide key. Each encryption draws a
//! fresh 96-bit nonce. The stored form is
//!
//! ```text
//! v1:<base64(nonce || ciphertext || tag)>
//! ```
//!
//! The `v1` prefix names the key generation. A future rotation adds a `v2`
//! key alongside the current one; until then any other prefix is rejected.

use aes_gcm::{
	aead::{Aead, KeyInit, OsRng},
	Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use botgate_common_secret::SecretString;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{SecretsError, SecretsResult};

/// Size of the cipher key in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

const TAG_SIZE: usize = 16;

/// Version prefix written on every ciphertext.
pub const CIPHERTEXT_VERSION: &str = "v1";

/// Generate a random cipher key.
pub fn generate_key() -> Zeroizing<[u8; KEY_SIZE]> {
	let mut key = Zeroizing::new([0u8; KEY_SIZE]);
	OsRng.fill_bytes(key.as_mut());
	key
}

/// Generate a random nonce.
///
/// 96-bit random nonces are safe well past any realistic number of stored
/// credentials under one key (collision odds reach 2^-32 only after about
/// 2^32 encryptions).
fn generate_nonce() -> [u8; NONCE_SIZE] {
	let mut nonce = [0u8; NONCE_SIZE];
	OsRng.fill_bytes(&mut nonce);
	nonce
}

/// Encrypts and decrypts provider secrets under the process-wide key.
///
/// Holds nothing but the key, which is read-only after construction, so one
/// instance is shared by every request.
pub struct SecretCipher {
	key: Zeroizing<[u8; KEY_SIZE]>,
}

impl SecretCipher {
	pub fn new(key: Zeroizing<[u8; KEY_SIZE]>) -> Self {
		Self { key }
	}

	/// Build a cipher from a base64-encoded 32-byte key.
	///
	/// # Errors
	/// `Configuration` if the value is not base64, `InvalidKeySize` if it does
	/// not decode to exactly [`KEY_SIZE`] bytes.
	pub fn from_base64(encoded: &SecretString) -> SecretsResult<Self> {
		let decoded = Zeroizing::new(
			STANDARD
				.decode(encoded.expose().trim())
				.map_err(|_| SecretsError::Configuration("cipher key is not valid base64".into()))?,
		);

		if decoded.len() != KEY_SIZE {
			return Err(SecretsError::InvalidKeySize {
				expected: KEY_SIZE,
				actual: decoded.len(),
			});
		}

		let mut key = Zeroizing::new([0u8; KEY_SIZE]);
		key.copy_from_slice(&decoded);
		Ok(Self::new(key))
	}

	/// A cipher under a freshly generated random key.
	///
	/// Anything encrypted with it is unreadable after the process exits.
	pub fn ephemeral() -> Self {
		Self::new(generate_key())
	}

	fn aead(&self) -> Aes256Gcm {
		Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.key.as_slice()))
	}

	/// Seal `plaintext` into the versioned string form.
	pub fn encrypt(&self, plaintext: &SecretString) -> SecretsResult<String> {
		let nonce_bytes = generate_nonce();
		let nonce = Nonce::from_slice(&nonce_bytes);

		let ciphertext = self
			.aead()
			.encrypt(nonce, plaintext.expose().as_bytes())
			.map_err(|e| SecretsError::Encryption(format!("secret encryption failed: {e}")))?;

		let mut payload = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
		payload.extend_from_slice(&nonce_bytes);
		payload.extend_from_slice(&ciphertext);

		Ok(format!("{CIPHERTEXT_VERSION}:{}", STANDARD.encode(payload)))
	}

	/// Open a string produced by [`SecretCipher::encrypt`] under the same key.
	///
	/// # Errors
	/// `Decryption` for an unknown version, malformed encoding, wrong key or
	/// any tampering. Never returns partially decrypted data.
	pub fn decrypt(&self, ciphertext: &str) -> SecretsResult<SecretString> {
		let (version, encoded) = ciphertext
			.split_once(':')
			.ok_or_else(|| SecretsError::Decryption("missing ciphertext version".into()))?;
		if version != CIPHERTEXT_VERSION {
			return Err(SecretsError::Decryption(format!(
				"unsupported ciphertext version: {version}"
			)));
		}

		let payload = STANDARD
			.decode(encoded)
			.map_err(|_| SecretsError::Decryption("ciphertext is not valid base64".into()))?;
		if payload.len() < NONCE_SIZE + TAG_SIZE {
			return Err(SecretsError::Decryption("ciphertext is truncated".into()));
		}

		let (nonce_bytes, sealed) = payload.split_at(NONCE_SIZE);
		let plaintext = Zeroizing::new(
			self
				.aead()
				.decrypt(Nonce::from_slice(nonce_bytes), sealed)
				.map_err(|e| SecretsError::Decryption(format!("secret decryption failed: {e}")))?,
		);

		let text = std::str::from_utf8(&plaintext)
			.map_err(|_| SecretsError::Decryption("plaintext is not UTF-8".into()))?;
		Ok(SecretString::new(text.to_string()))
	}
}

impl fmt::Debug for SecretCipher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SecretCipher")
			.field("key", &botgate_common_secret::REDACTED)
			.finish()
	}
}
