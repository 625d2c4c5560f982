// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential vault: the lifecycle of a user's provider API keys.
//!
//! Every operation acts for a verified [`Identity`]. Mutations read the
//! current record through the [`OwnershipGuard`] and then issue a store
//! update that is itself conditional on the owner, so a record cannot change
//! hands between the check and the write.

use std::sync::Arc;

use botgate_common_secret::SecretString;
use botgate_server_auth::{CredentialId, Identity, Provider};
use botgate_server_db::{CredentialChanges, CredentialRecord, CredentialStore, OwnershipGuard};
use tracing::{info, instrument};

use crate::encryption::SecretCipher;
use crate::error::{SecretsError, SecretsResult};
use crate::preview::create_preview;

/// Longest accepted display name, in characters.
pub const MAX_CREDENTIAL_NAME_LEN: usize = 100;

/// A credential decrypted for a single upstream call.
///
/// Drop it as soon as the call returns; the secret zeroizes on drop.
#[derive(Debug)]
pub struct UsableCredential {
	pub id: CredentialId,
	pub provider: Provider,
	pub is_active: bool,
	pub secret: SecretString,
}

#[derive(Clone)]
pub struct CredentialVault {
	cipher: Arc<SecretCipher>,
	credentials: Arc<dyn CredentialStore>,
	guard: OwnershipGuard,
}

impl CredentialVault {
	pub fn new(
		cipher: Arc<SecretCipher>,
		credentials: Arc<dyn CredentialStore>,
		guard: OwnershipGuard,
	) -> Self {
		Self {
			cipher,
			credentials,
			guard,
		}
	}

	/// Encrypt and persist a new credential for `identity`.
	///
	/// `provider`, `name` and `secret` are trimmed first. The secret is sealed
	/// with the process cipher; only the ciphertext and a masked preview are
	/// stored. New credentials start active.
	///
	/// # Errors
	/// `Validation` for an empty name or secret, a name longer than
	/// [`MAX_CREDENTIAL_NAME_LEN`], or an unknown provider.
	#[instrument(skip(self, identity, provider, name, secret), fields(user_id = %identity.user_id, provider = %provider.trim()))]
	pub async fn store(
		&self,
		identity: &Identity,
		provider: &str,
		name: &str,
		secret: &SecretString,
	) -> SecretsResult<CredentialRecord> {
		let provider = provider.trim();
		let name = validate_name(name)?;
		let secret = secret.trimmed();

		if provider.is_empty() || secret.is_empty() {
			return Err(SecretsError::Validation(
				"provider, name and API key are required".into(),
			));
		}
		let provider = provider
			.parse::<Provider>()
			.map_err(|e| SecretsError::Validation(e.to_string()))?;

		let ciphertext = self.cipher.encrypt(&secret)?;
		let key_preview = create_preview(&secret);

		let record = CredentialRecord::new(
			identity.user_id,
			provider,
			name,
			ciphertext,
			key_preview,
		);
		self.credentials.create_credential(&record).await?;

		info!(credential_id = %record.id, provider = %record.provider, "stored provider credential");
		Ok(record)
	}

	/// All of `identity`'s credentials, newest first.
	#[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
	pub async fn list(&self, identity: &Identity) -> SecretsResult<Vec<CredentialRecord>> {
		Ok(
			self
				.credentials
				.list_credentials_for_owner(&identity.user_id)
				.await?,
		)
	}

	pub async fn rename(
		&self,
		identity: &Identity,
		id: &CredentialId,
		new_name: &str,
	) -> SecretsResult<CredentialRecord> {
		self
			.update(
				identity,
				id,
				CredentialChanges {
					name: Some(new_name.to_string()),
					is_active: None,
				},
			)
			.await
	}

	pub async fn set_active(
		&self,
		identity: &Identity,
		id: &CredentialId,
		is_active: bool,
	) -> SecretsResult<CredentialRecord> {
		self
			.update(
				identity,
				id,
				CredentialChanges {
					name: None,
					is_active: Some(is_active),
				},
			)
			.await
	}

	/// Apply a partial update to a credential `identity` owns.
	///
	/// Ownership is checked before the changes are validated, so a caller
	/// probing someone else's id always sees `CredentialNotFound`.
	///
	/// # Errors
	/// - `CredentialNotFound` if absent or not owned
	/// - `Validation` if no field is set or the new name is invalid
	#[instrument(skip(self, identity, id, changes), fields(user_id = %identity.user_id, credential_id = %id))]
	pub async fn update(
		&self,
		identity: &Identity,
		id: &CredentialId,
		changes: CredentialChanges,
	) -> SecretsResult<CredentialRecord> {
		self.guard.authorize_credential(identity, id).await?;

		if changes.is_empty() {
			return Err(SecretsError::Validation("no fields to update".into()));
		}
		let changes = CredentialChanges {
			name: changes.name.as_deref().map(validate_name).transpose()?,
			is_active: changes.is_active,
		};

		self
			.credentials
			.update_credential(id, &identity.user_id, &changes)
			.await?
			.ok_or(SecretsError::CredentialNotFound)
	}

	/// Permanently delete a credential `identity` owns.
	#[instrument(skip(self, identity, id), fields(user_id = %identity.user_id, credential_id = %id))]
	pub async fn remove(&self, identity: &Identity, id: &CredentialId) -> SecretsResult<()> {
		self.guard.authorize_credential(identity, id).await?;

		if !self.credentials.delete_credential(id, &identity.user_id).await? {
			return Err(SecretsError::CredentialNotFound);
		}

		info!(credential_id = %id, "deleted provider credential");
		Ok(())
	}

	/// Decrypt a credential `identity` owns for immediate use.
	///
	/// This is the only way plaintext leaves the vault. The result is not
	/// cached; each call decrypts again.
	///
	/// # Errors
	/// - `CredentialNotFound` if absent or not owned
	/// - `Decryption` if the stored ciphertext cannot be opened with the
	///   current key
	#[instrument(skip(self, identity, id), fields(user_id = %identity.user_id, credential_id = %id))]
	pub async fn resolve_for_use(
		&self,
		identity: &Identity,
		id: &CredentialId,
	) -> SecretsResult<UsableCredential> {
		let record = self.guard.authorize_credential(identity, id).await?;
		let secret = self.cipher.decrypt(&record.ciphertext)?;

		Ok(UsableCredential {
			id: record.id,
			provider: record.provider,
			is_active: record.is_active,
			secret,
		})
	}
}

/// Trim and bound-check a display name.
fn validate_name(name: &str) -> SecretsResult<String> {
	let name = name.trim();
	if name.is_empty() {
		return Err(SecretsError::Validation("name cannot be empty".into()));
	}
	if name.chars().count() > MAX_CREDENTIAL_NAME_LEN {
		return Err(SecretsError::Validation(format!(
			"name must be {MAX_CREDENTIAL_NAME_LEN} characters or fewer"
		)));
	}
	Ok(name.to_string())
}
