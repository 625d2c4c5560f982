// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ownership-based authorization.
//!
//! Bots and stored credentials belong to exactly one user. Any read or
//! mutation must first confirm the requesting identity is that owner. When it
//! is not, the result is [`AuthError::ResourceNotFound`], the same error as
//! when the record does not exist, so ids belonging to other users cannot be
//! probed.

use tracing::debug;

use crate::error::AuthError;
use crate::types::UserId;
use crate::user::Identity;

/// A record bound to the user that created it.
pub trait OwnedResource {
	fn owner_id(&self) -> &UserId;
}

/// True when `identity` owns `resource`.
pub fn is_owned_by<T: OwnedResource>(resource: &T, identity: &Identity) -> bool {
	resource.owner_id() == &identity.user_id
}

/// Admit a looked-up resource only if `identity` owns it.
///
/// `resource` is the result of a primary-key lookup; `None` and a foreign
/// owner both yield [`AuthError::ResourceNotFound`].
pub fn authorize_owned<T: OwnedResource>(
	identity: &Identity,
	resource: Option<T>,
) -> Result<T, AuthError> {
	match resource {
		Some(resource) if is_owned_by(&resource, identity) => Ok(resource),
		Some(_) => {
			debug!(user_id = %identity.user_id, "ownership check failed");
			Err(AuthError::ResourceNotFound)
		}
		None => Err(AuthError::ResourceNotFound),
	}
}
