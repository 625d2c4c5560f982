// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider credential repository.
//!
//! A credential row holds a user's third-party API key in encrypted form
//! (`ciphertext`) together with a masked preview for display. The plaintext
//! key is never written here; encryption happens in the secrets crate before
//! a [`CredentialRecord`] reaches this module.

use async_trait::async_trait;
use botgate_server_auth::{CredentialId, OwnedResource, Provider, UserId};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use std::fmt;
use uuid::Uuid;

use crate::error::DbError;
use crate::timestamp;

/// A stored provider credential.
#[derive(Clone)]
pub struct CredentialRecord {
	pub id: CredentialId,
	pub owner_id: UserId,
	pub provider: Provider,
	pub name: String,
	/// Output of the secret cipher; only decryptable with the process key.
	pub ciphertext: String,
	pub key_preview: String,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
	pub fn new(
		owner_id: UserId,
		provider: Provider,
		name: impl Into<String>,
		ciphertext: String,
		key_preview: String,
	) -> Self {
		let now = Utc::now();
		Self {
			id: CredentialId::generate(),
			owner_id,
			provider,
			name: name.into(),
			ciphertext,
			key_preview,
			is_active: true,
			created_at: now,
			updated_at: now,
		}
	}
}

impl OwnedResource for CredentialRecord {
	fn owner_id(&self) -> &UserId {
		&self.owner_id
	}
}

impl fmt::Debug for CredentialRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CredentialRecord")
			.field("id", &self.id)
			.field("owner_id", &self.owner_id)
			.field("provider", &self.provider)
			.field("name", &self.name)
			.field("key_preview", &self.key_preview)
			.field("is_active", &self.is_active)
			.finish_non_exhaustive()
	}
}

/// Partial update of a credential's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialChanges {
	pub name: Option<String>,
	pub is_active: Option<bool>,
}

impl CredentialChanges {
	pub fn is_empty(&self) -> bool {
		self.name.is_none() && self.is_active.is_none()
	}
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
	async fn create_credential(&self, record: &CredentialRecord) -> Result<(), DbError>;
	async fn get_credential_by_id(
		&self,
		id: &CredentialId,
	) -> Result<Option<CredentialRecord>, DbError>;
	async fn list_credentials_for_owner(
		&self,
		owner_id: &UserId,
	) -> Result<Vec<CredentialRecord>, DbError>;
	async fn update_credential(
		&self,
		id: &CredentialId,
		owner_id: &UserId,
		changes: &CredentialChanges,
	) -> Result<Option<CredentialRecord>, DbError>;
	async fn delete_credential(&self, id: &CredentialId, owner_id: &UserId) -> Result<bool, DbError>;
}

#[async_trait]
impl CredentialStore for CredentialRepository {
	async fn create_credential(&self, record: &CredentialRecord) -> Result<(), DbError> {
		self.create_credential(record).await
	}

	async fn get_credential_by_id(
		&self,
		id: &CredentialId,
	) -> Result<Option<CredentialRecord>, DbError> {
		self.get_credential_by_id(id).await
	}

	async fn list_credentials_for_owner(
		&self,
		owner_id: &UserId,
	) -> Result<Vec<CredentialRecord>, DbError> {
		self.list_credentials_for_owner(owner_id).await
	}

	async fn update_credential(
		&self,
		id: &CredentialId,
		owner_id: &UserId,
		changes: &CredentialChanges,
	) -> Result<Option<CredentialRecord>, DbError> {
		self.update_credential(id, owner_id, changes).await
	}

	async fn delete_credential(&self, id: &CredentialId, owner_id: &UserId) -> Result<bool, DbError> {
		self.delete_credential(id, owner_id).await
	}
}

/// Repository for provider credentials.
#[derive(Clone)]
pub struct CredentialRepository {
	pool: SqlitePool,
}

impl CredentialRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a credential.
	///
	/// # Database Constraints
	/// - `owner_id` must reference an existing user
	#[tracing::instrument(
		skip(self, record),
		fields(credential_id = %record.id, owner_id = %record.owner_id, provider = %record.provider)
	)]
	pub async fn create_credential(&self, record: &CredentialRecord) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO credentials (
				id, owner_id, provider, name, ciphertext, key_preview, is_active,
				created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(record.id.to_string())
		.bind(record.owner_id.to_string())
		.bind(record.provider.as_str())
		.bind(&record.name)
		.bind(&record.ciphertext)
		.bind(&record.key_preview)
		.bind(record.is_active)
		.bind(timestamp::format(&record.created_at))
		.bind(timestamp::format(&record.updated_at))
		.execute(&self.pool)
		.await?;

		tracing::debug!(credential_id = %record.id, "credential created");
		Ok(())
	}

	/// Get a credential by id regardless of owner.
	///
	/// Callers acting for a user must go through [`crate::OwnershipGuard`].
	#[tracing::instrument(skip(self), fields(credential_id = %id))]
	pub async fn get_credential_by_id(
		&self,
		id: &CredentialId,
	) -> Result<Option<CredentialRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, owner_id, provider, name, ciphertext, key_preview, is_active,
			       created_at, updated_at
			FROM credentials
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|row| parse_credential_row(&row)).transpose()
	}

	/// List a user's credentials, newest first.
	#[tracing::instrument(skip(self), fields(owner_id = %owner_id))]
	pub async fn list_credentials_for_owner(
		&self,
		owner_id: &UserId,
	) -> Result<Vec<CredentialRecord>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, owner_id, provider, name, ciphertext, key_preview, is_active,
			       created_at, updated_at
			FROM credentials
			WHERE owner_id = ?
			ORDER BY created_at DESC, rowid DESC
			"#,
		)
		.bind(owner_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_credential_row).collect()
	}

	/// Apply `changes` to a credential owned by `owner_id`.
	///
	/// Fields left as `None` keep their stored value.
	///
	/// # Returns
	/// The updated record, or `None` if no credential with this id belongs to
	/// `owner_id`.
	#[tracing::instrument(skip(self, changes), fields(credential_id = %id, owner_id = %owner_id))]
	pub async fn update_credential(
		&self,
		id: &CredentialId,
		owner_id: &UserId,
		changes: &CredentialChanges,
	) -> Result<Option<CredentialRecord>, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE credentials
			SET name = COALESCE(?, name),
			    is_active = COALESCE(?, is_active),
			    updated_at = ?
			WHERE id = ? AND owner_id = ?
			"#,
		)
		.bind(changes.name.as_deref())
		.bind(changes.is_active)
		.bind(timestamp::format(&Utc::now()))
		.bind(id.to_string())
		.bind(owner_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_credential_by_id(id).await
	}

	/// Delete a credential owned by `owner_id`.
	///
	/// Bots referencing it have their `api_key_id` cleared by the schema.
	///
	/// # Returns
	/// `true` if a row was deleted.
	#[tracing::instrument(skip(self), fields(credential_id = %id, owner_id = %owner_id))]
	pub async fn delete_credential(&self, id: &CredentialId, owner_id: &UserId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM credentials WHERE id = ? AND owner_id = ?")
			.bind(id.to_string())
			.bind(owner_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn parse_credential_row(row: &sqlx::sqlite::SqliteRow) -> Result<CredentialRecord, DbError> {
	let id_str: String = row.get("id");
	let owner_id_str: String = row.get("owner_id");
	let provider_str: String = row.get("provider");
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	let id = Uuid::parse_str(&id_str)
		.map_err(|e| DbError::Internal(format!("Invalid credential id UUID: {e}")))?;
	let owner_id = Uuid::parse_str(&owner_id_str)
		.map_err(|e| DbError::Internal(format!("Invalid owner_id UUID: {e}")))?;
	let provider = provider_str
		.parse::<Provider>()
		.map_err(|e| DbError::Internal(format!("Invalid provider column: {e}")))?;

	Ok(CredentialRecord {
		id: CredentialId::new(id),
		owner_id: UserId::new(owner_id),
		provider,
		name: row.get("name"),
		ciphertext: row.get("ciphertext"),
		key_preview: row.get("key_preview"),
		is_active: row.get("is_active"),
		created_at: timestamp::parse(&created_at_str, "created_at")?,
		updated_at: timestamp::parse(&updated_at_str, "updated_at")?,
	})
}
