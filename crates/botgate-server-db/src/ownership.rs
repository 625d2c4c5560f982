// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ownership-scoped resolution of bots and credentials.
//!
//! Every handler that acts on a bot or credential on behalf of a user resolves
//! it through [`OwnershipGuard`] first. The guard fetches the record by its
//! primary key and admits it only when the caller owns it; otherwise the
//! result is [`DbError::NotFound`], whether or not the row exists.

use std::sync::Arc;

use botgate_server_auth::{authorize_owned, BotId, CredentialId, Identity};
use tracing::instrument;

use crate::bot::{Bot, BotStore};
use crate::credential::{CredentialRecord, CredentialStore};
use crate::error::DbError;

#[derive(Clone)]
pub struct OwnershipGuard {
	bots: Arc<dyn BotStore>,
	credentials: Arc<dyn CredentialStore>,
}

impl OwnershipGuard {
	pub fn new(bots: Arc<dyn BotStore>, credentials: Arc<dyn CredentialStore>) -> Self {
		Self { bots, credentials }
	}

	/// Resolve `bot_id` for `identity`.
	///
	/// # Errors
	/// `DbError::NotFound` if the bot is absent or owned by another user.
	#[instrument(skip(self, identity), fields(user_id = %identity.user_id, bot_id = %bot_id))]
	pub async fn authorize_bot(&self, identity: &Identity, bot_id: &BotId) -> Result<Bot, DbError> {
		let bot = self.bots.get_bot_by_id(bot_id).await?;
		authorize_owned(identity, bot).map_err(|_| DbError::NotFound(format!("bot {bot_id}")))
	}

	/// Resolve `credential_id` for `identity`.
	///
	/// # Errors
	/// `DbError::NotFound` if the credential is absent or owned by another user.
	#[instrument(
		skip(self, identity),
		fields(user_id = %identity.user_id, credential_id = %credential_id)
	)]
	pub async fn authorize_credential(
		&self,
		identity: &Identity,
		credential_id: &CredentialId,
	) -> Result<CredentialRecord, DbError> {
		let credential = self.credentials.get_credential_by_id(credential_id).await?;
		authorize_owned(identity, credential)
			.map_err(|_| DbError::NotFound(format!("credential {credential_id}")))
	}
}
