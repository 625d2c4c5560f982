// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions shared across the gateway.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`UserId`], [`BotId`],
//!   [`CredentialId`]) so a bot id can never be passed where a credential id
//!   is expected
//! - **Providers**: the closed set of upstream LLM vendors a credential can
//!   belong to ([`Provider`])
//!
//! All ID types serialize transparently as UUID strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			pub fn into_inner(self) -> Uuid {
				self.0
			}

			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}

			/// Parse an ID from a path segment or stored column.
			///
			/// Returns `None` for anything that is not a UUID; callers treat
			/// that the same as an id that does not exist.
			pub fn parse(s: &str) -> Option<Self> {
				Uuid::parse_str(s).ok().map(Self)
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(BotId, "Unique identifier for a bot.");
define_id_type!(CredentialId, "Unique identifier for a stored provider credential.");

// =============================================================================
// Providers
// =============================================================================

/// Upstream LLM vendor a credential authenticates against.
///
/// Every variant can be stored; only some have an adapter that can dispatch
/// chat requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
	OpenAi,
	Anthropic,
	Google,
	Azure,
	Custom,
}

impl Provider {
	pub fn all() -> &'static [Provider] {
		&[
			Provider::OpenAi,
			Provider::Anthropic,
			Provider::Google,
			Provider::Azure,
			Provider::Custom,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Provider::OpenAi => "openai",
			Provider::Anthropic => "anthropic",
			Provider::Google => "google",
			Provider::Azure => "azure",
			Provider::Custom => "custom",
		}
	}
}

impl fmt::Display for Provider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a provider string is not one of the known vendors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProviderError(pub String);

impl FromStr for Provider {
	type Err = UnknownProviderError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"openai" => Ok(Provider::OpenAi),
			"anthropic" => Ok(Provider::Anthropic),
			"google" => Ok(Provider::Google),
			"azure" => Ok(Provider::Azure),
			"custom" => Ok(Provider::Custom),
			other => Err(UnknownProviderError(other.to_string())),
		}
	}
}
