// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential vault for botgate.
//!
//! Users hand botgate API keys for third-party LLM providers. This crate is
//! the only place those keys exist in plaintext:
//!
//! - **At rest**: keys are sealed with AES-256-GCM under one process-wide key
//!   ([`SecretCipher`]). Only the ciphertext and a masked preview are stored.
//! - **In use**: [`CredentialVault::resolve_for_use`] is the single path that
//!   decrypts, and only after the caller's ownership has been confirmed.
//! - **Everywhere else**: plaintext travels as [`SecretString`], which redacts
//!   itself in logs and serialization and zeroizes on drop.
//!
//! [`SecretString`]: botgate_common_secret::SecretString

pub mod encryption;
pub mod error;
pub mod preview;
pub mod vault;

pub use encryption::{generate_key, SecretCipher, CIPHERTEXT_VERSION, KEY_SIZE, NONCE_SIZE};
pub use error::{SecretsError, SecretsResult};
pub use preview::{create_preview, PREVIEW_MASK};
pub use vault::{CredentialVault, UsableCredential, MAX_CREDENTIAL_NAME_LEN};
