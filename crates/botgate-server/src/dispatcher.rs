// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Chat dispatch: from an authenticated request to one upstream LLM call.
//!
//! ```text
//! Authenticated ─> message check ─> bot owned? ─> credential active?
//!               ─> adapter for provider ─> decrypt ─> send ─> Succeeded | Failed
//! ```
//!
//! Each arrow can short-circuit with a [`DispatchError`]. Authentication
//! itself happens in the middleware before the dispatcher is reached.
//!
//! The decrypted key lives in this module's stack frame only. It is dropped
//! (and zeroized) as soon as the adapter returns, whether or not the call
//! succeeded.

use std::sync::Arc;

use botgate_server_auth::{BotId, Identity};
use botgate_server_db::{Bot, CredentialRecord, DbError, OwnershipGuard};
use botgate_server_llm::{ChatRequest, ChatResult, ProviderError, ProviderRegistry};
use botgate_server_secrets::{CredentialVault, SecretsError};
use thiserror::Error;
use tracing::instrument;

/// System prompt used when a bot has no description.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and capable AI assistant.";

/// The single message shown to users for any upstream failure.
pub const PROVIDER_FAILURE_MESSAGE: &str =
	"Failed to get a response from the AI service. Please check your API key.";

/// Ways a chat dispatch can stop short of a reply.
#[derive(Debug, Error)]
pub enum DispatchError {
	#[error("message is required")]
	EmptyMessage,

	/// The bot is absent or owned by someone else.
	#[error("bot not found")]
	BotNotFound,

	/// The bot has no credential, or its credential is gone or inactive.
	#[error("no API key configured for this bot")]
	NoCredential,

	#[error(transparent)]
	Provider(#[from] ProviderError),

	/// The stored key could not be decrypted, or the vault failed otherwise.
	#[error("credential error: {0}")]
	Credential(SecretsError),

	#[error("database error: {0}")]
	Database(DbError),
}

impl DispatchError {
	/// Returns true if this error should be logged at error level.
	pub fn is_internal(&self) -> bool {
		match self {
			DispatchError::Provider(e) => !e.is_client_error(),
			DispatchError::Credential(_) | DispatchError::Database(_) => true,
			DispatchError::EmptyMessage | DispatchError::BotNotFound | DispatchError::NoCredential => {
				false
			}
		}
	}

	/// Returns the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			DispatchError::EmptyMessage | DispatchError::NoCredential => 400,
			DispatchError::BotNotFound => 404,
			DispatchError::Provider(e) => e.status_code(),
			DispatchError::Credential(_) | DispatchError::Database(_) => 500,
		}
	}
}

/// Routes a user's chat message to the provider behind one of their bots.
#[derive(Clone)]
pub struct ChatDispatcher {
	guard: OwnershipGuard,
	vault: CredentialVault,
	registry: Arc<ProviderRegistry>,
}

impl ChatDispatcher {
	pub fn new(guard: OwnershipGuard, vault: CredentialVault, registry: Arc<ProviderRegistry>) -> Self {
		Self {
			guard,
			vault,
			registry,
		}
	}

	/// Send `message` to the bot's provider and return the reply.
	///
	/// # Errors
	/// - `EmptyMessage` if `message` is blank
	/// - `BotNotFound` if the bot is absent or not owned by `identity`
	/// - `NoCredential` if the bot has no usable credential
	/// - `Provider(Unsupported)` if no adapter exists for the credential's
	///   provider; nothing is decrypted or sent
	/// - `Credential` if the stored key cannot be decrypted
	/// - `Provider(..)` for any upstream or transport failure
	#[instrument(
		skip(self, identity, bot_id, message),
		fields(user_id = %identity.user_id, bot_id = %bot_id, provider = tracing::field::Empty)
	)]
	pub async fn dispatch(
		&self,
		identity: &Identity,
		bot_id: &BotId,
		message: &str,
	) -> Result<ChatResult, DispatchError> {
		if message.trim().is_empty() {
			return Err(DispatchError::EmptyMessage);
		}

		let bot = self.authorized_bot(identity, bot_id).await?;
		let record = self.active_credential(identity, &bot).await?;
		tracing::Span::current().record("provider", record.provider.as_str());

		let adapter = self.registry.select(record.provider)?;

		let credential = match self.vault.resolve_for_use(identity, &record.id).await {
			Ok(credential) => credential,
			Err(SecretsError::CredentialNotFound) => return Err(DispatchError::NoCredential),
			Err(e) => return Err(DispatchError::Credential(e)),
		};

		let request = ChatRequest::new(system_prompt(&bot), message);
		let result = adapter.send(&credential.secret, &request).await;
		drop(credential);

		let result = result?;
		tracing::debug!(model = %result.model, "chat dispatch succeeded");
		Ok(result)
	}

	async fn authorized_bot(&self, identity: &Identity, bot_id: &BotId) -> Result<Bot, DispatchError> {
		match self.guard.authorize_bot(identity, bot_id).await {
			Ok(bot) => Ok(bot),
			Err(DbError::NotFound(_)) => Err(DispatchError::BotNotFound),
			Err(e) => Err(DispatchError::Database(e)),
		}
	}

	async fn active_credential(
		&self,
		identity: &Identity,
		bot: &Bot,
	) -> Result<CredentialRecord, DispatchError> {
		let credential_id = bot.api_key_id.ok_or(DispatchError::NoCredential)?;
		let record = match self.guard.authorize_credential(identity, &credential_id).await {
			Ok(record) => record,
			Err(DbError::NotFound(_)) => return Err(DispatchError::NoCredential),
			Err(e) => return Err(DispatchError::Database(e)),
		};

		if !record.is_active {
			tracing::debug!(credential_id = %record.id, "bot credential is inactive");
			return Err(DispatchError::NoCredential);
		}
		Ok(record)
	}
}

/// The bot's description, or the default assistant prompt when it has none.
fn system_prompt(bot: &Bot) -> &str {
	bot
		.description
		.as_deref()
		.map(str::trim)
		.filter(|d| !d.is_empty())
		.unwrap_or(DEFAULT_SYSTEM_PROMPT)
}

#[cfg(test)]
mod tests {
	use super::*;
	use botgate_server_auth::{CredentialId, Provider, UserId};

	fn bot_with(description: Option<&str>) -> Bot {
		Bot::new(
			UserId::generate(),
			"Helper",
			description.map(str::to_string),
			None::<CredentialId>,
		)
	}

	mod prompt {
		use super::*;

		#[test]
		fn description_becomes_system_prompt() {
			let bot = bot_with(Some("You answer in haiku."));
			assert_eq!(system_prompt(&bot), "You answer in haiku.");
		}

		#[test]
		fn missing_or_blank_description_uses_default() {
			assert_eq!(system_prompt(&bot_with(None)), DEFAULT_SYSTEM_PROMPT);
			assert_eq!(system_prompt(&bot_with(Some("  "))), DEFAULT_SYSTEM_PROMPT);
		}
	}

	mod errors {
		use super::*;

		#[test]
		fn status_codes() {
			assert_eq!(DispatchError::EmptyMessage.status_code(), 400);
			assert_eq!(DispatchError::NoCredential.status_code(), 400);
			assert_eq!(DispatchError::BotNotFound.status_code(), 404);
			assert_eq!(
				DispatchError::Provider(ProviderError::Unsupported(Provider::Azure)).status_code(),
				400
			);
			assert_eq!(
				DispatchError::Provider(ProviderError::Timeout {
					provider: Provider::OpenAi
				})
				.status_code(),
				500
			);
			assert_eq!(
				DispatchError::Credential(SecretsError::Decryption("tag".into())).status_code(),
				500
			);
		}

		#[test]
		fn only_faults_are_internal() {
			assert!(!DispatchError::NoCredential.is_internal());
			assert!(!DispatchError::Provider(ProviderError::Unsupported(Provider::Custom)).is_internal());
			assert!(DispatchError::Provider(ProviderError::Call {
				provider: Provider::Anthropic,
				status_text: "Unauthorized".into(),
			})
			.is_internal());
			assert!(DispatchError::Credential(SecretsError::Decryption("x".into())).is_internal());
		}
	}
}
