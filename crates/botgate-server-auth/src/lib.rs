// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and ownership for botgate.
//!
//! This crate provides:
//! - Typed identifiers ([`UserId`], [`BotId`], [`CredentialId`]) and the
//!   [`Provider`] enumeration
//! - Password hashing with Argon2id
//! - Stateless signed session tokens ([`SessionAuthenticator`])
//! - The ownership predicate every bot and credential access goes through
//!   ([`authorize_owned`])
//! - Cookie and header helpers for carrying the session token over HTTP
//!
//! # Security Considerations
//!
//! - Passwords are stored as Argon2id PHC strings, never plaintext
//! - Session verification returns `None` for every failure cause so callers
//!   cannot branch on why a token was rejected
//! - A resource owned by someone else is reported exactly like a missing one
//! - Signing keys are held as [`botgate_common_secret::SecretString`] and never logged

mod argon2_config;
pub mod error;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod session;
pub mod types;
pub mod user;

pub use error::AuthError;
pub use middleware::{
	clear_session_cookie, extract_bearer_token, extract_session_cookie_with_name,
	session_cookie, session_token_candidates, AuthConfig, SESSION_COOKIE_NAME,
};
pub use ownership::{authorize_owned, is_owned_by, OwnedResource};
pub use password::{
	hash_password, verify_password, verify_password_for_unknown_user, MIN_PASSWORD_LENGTH,
};
pub use session::{SessionAuthenticator, MIN_SIGNING_KEY_LEN, SESSION_EXPIRY_HOURS};
pub use types::{BotId, CredentialId, Provider, UnknownProviderError, UserId};
pub use user::{Identity, User};
