// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bot repository.

use async_trait::async_trait;
use botgate_server_auth::{BotId, CredentialId, OwnedResource, UserId};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;
use crate::timestamp;

/// A chat bot owned by one user.
#[derive(Debug, Clone)]
pub struct Bot {
	pub id: BotId,
	pub owner_id: UserId,
	pub name: String,
	/// Used as the system prompt when chatting.
	pub description: Option<String>,
	/// Credential used to reach the upstream provider.
	pub api_key_id: Option<CredentialId>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Bot {
	pub fn new(
		owner_id: UserId,
		name: impl Into<String>,
		description: Option<String>,
		api_key_id: Option<CredentialId>,
	) -> Self {
		let now = Utc::now();
		Self {
			id: BotId::generate(),
			owner_id,
			name: name.into(),
			description,
			api_key_id,
			created_at: now,
			updated_at: now,
		}
	}
}

impl OwnedResource for Bot {
	fn owner_id(&self) -> &UserId {
		&self.owner_id
	}
}

/// Replacement values for a bot update.
///
/// `api_key_id` is tri-state: `None` keeps the stored credential,
/// `Some(None)` clears it, `Some(Some(id))` assigns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotChanges {
	pub name: String,
	pub description: Option<String>,
	pub api_key_id: Option<Option<CredentialId>>,
}

#[async_trait]
pub trait BotStore: Send + Sync {
	async fn create_bot(&self, bot: &Bot) -> Result<(), DbError>;
	async fn get_bot_by_id(&self, id: &BotId) -> Result<Option<Bot>, DbError>;
	async fn list_bots_for_owner(&self, owner_id: &UserId) -> Result<Vec<Bot>, DbError>;
	async fn update_bot(
		&self,
		id: &BotId,
		owner_id: &UserId,
		changes: &BotChanges,
	) -> Result<Option<Bot>, DbError>;
	async fn delete_bot(&self, id: &BotId, owner_id: &UserId) -> Result<bool, DbError>;
}

#[async_trait]
impl BotStore for BotRepository {
	async fn create_bot(&self, bot: &Bot) -> Result<(), DbError> {
		self.create_bot(bot).await
	}

	async fn get_bot_by_id(&self, id: &BotId) -> Result<Option<Bot>, DbError> {
		self.get_bot_by_id(id).await
	}

	async fn list_bots_for_owner(&self, owner_id: &UserId) -> Result<Vec<Bot>, DbError> {
		self.list_bots_for_owner(owner_id).await
	}

	async fn update_bot(
		&self,
		id: &BotId,
		owner_id: &UserId,
		changes: &BotChanges,
	) -> Result<Option<Bot>, DbError> {
		self.update_bot(id, owner_id, changes).await
	}

	async fn delete_bot(&self, id: &BotId, owner_id: &UserId) -> Result<bool, DbError> {
		self.delete_bot(id, owner_id).await
	}
}

/// Repository for bots.
#[derive(Clone)]
pub struct BotRepository {
	pool: SqlitePool,
}

impl BotRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a bot.
	///
	/// # Database Constraints
	/// - `owner_id` must reference an existing user
	/// - `api_key_id`, if set, must reference an existing credential
	#[tracing::instrument(skip(self, bot), fields(bot_id = %bot.id, owner_id = %bot.owner_id))]
	pub async fn create_bot(&self, bot: &Bot) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO bots (
				id, owner_id, name, description, api_key_id, created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(bot.id.to_string())
		.bind(bot.owner_id.to_string())
		.bind(&bot.name)
		.bind(bot.description.as_deref())
		.bind(bot.api_key_id.map(|id| id.to_string()))
		.bind(timestamp::format(&bot.created_at))
		.bind(timestamp::format(&bot.updated_at))
		.execute(&self.pool)
		.await?;

		tracing::debug!(bot_id = %bot.id, "bot created");
		Ok(())
	}

	/// Get a bot by id regardless of owner.
	///
	/// Callers acting for a user must go through [`crate::OwnershipGuard`].
	#[tracing::instrument(skip(self), fields(bot_id = %id))]
	pub async fn get_bot_by_id(&self, id: &BotId) -> Result<Option<Bot>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, owner_id, name, description, api_key_id, created_at, updated_at
			FROM bots
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|row| parse_bot_row(&row)).transpose()
	}

	/// List a user's bots, most recently updated first.
	#[tracing::instrument(skip(self), fields(owner_id = %owner_id))]
	pub async fn list_bots_for_owner(&self, owner_id: &UserId) -> Result<Vec<Bot>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, owner_id, name, description, api_key_id, created_at, updated_at
			FROM bots
			WHERE owner_id = ?
			ORDER BY updated_at DESC, rowid DESC
			"#,
		)
		.bind(owner_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_bot_row).collect()
	}

	/// Apply `changes` to a bot owned by `owner_id` and bump `updated_at`.
	///
	/// # Returns
	/// The updated bot, or `None` if no bot with this id belongs to `owner_id`.
	#[tracing::instrument(skip(self, changes), fields(bot_id = %id, owner_id = %owner_id))]
	pub async fn update_bot(
		&self,
		id: &BotId,
		owner_id: &UserId,
		changes: &BotChanges,
	) -> Result<Option<Bot>, DbError> {
		let now = timestamp::format(&Utc::now());

		let result = match changes.api_key_id {
			Some(api_key_id) => {
				sqlx::query(
					r#"
					UPDATE bots
					SET name = ?, description = ?, api_key_id = ?, updated_at = ?
					WHERE id = ? AND owner_id = ?
					"#,
				)
				.bind(&changes.name)
				.bind(changes.description.as_deref())
				.bind(api_key_id.map(|id| id.to_string()))
				.bind(&now)
				.bind(id.to_string())
				.bind(owner_id.to_string())
				.execute(&self.pool)
				.await?
			}
			None => {
				sqlx::query(
					r#"
					UPDATE bots
					SET name = ?, description = ?, updated_at = ?
					WHERE id = ? AND owner_id = ?
					"#,
				)
				.bind(&changes.name)
				.bind(changes.description.as_deref())
				.bind(&now)
				.bind(id.to_string())
				.bind(owner_id.to_string())
				.execute(&self.pool)
				.await?
			}
		};

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_bot_by_id(id).await
	}

	/// Delete a bot owned by `owner_id`.
	///
	/// # Returns
	/// `true` if a row was deleted.
	#[tracing::instrument(skip(self), fields(bot_id = %id, owner_id = %owner_id))]
	pub async fn delete_bot(&self, id: &BotId, owner_id: &UserId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM bots WHERE id = ? AND owner_id = ?")
			.bind(id.to_string())
			.bind(owner_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn parse_bot_row(row: &sqlx::sqlite::SqliteRow) -> Result<Bot, DbError> {
	let id_str: String = row.get("id");
	let owner_id_str: String = row.get("owner_id");
	let api_key_id_str: Option<String> = row.get("api_key_id");
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	let id = Uuid::parse_str(&id_str)
		.map_err(|e| DbError::Internal(format!("Invalid bot id UUID: {e}")))?;
	let owner_id = Uuid::parse_str(&owner_id_str)
		.map_err(|e| DbError::Internal(format!("Invalid owner_id UUID: {e}")))?;
	let api_key_id = api_key_id_str
		.map(|s| {
			Uuid::parse_str(&s)
				.map(CredentialId::new)
				.map_err(|e| DbError::Internal(format!("Invalid api_key_id UUID: {e}")))
		})
		.transpose()?;

	Ok(Bot {
		id: BotId::new(id),
		owner_id: UserId::new(owner_id),
		name: row.get("name"),
		description: row.get("description"),
		api_key_id,
		created_at: timestamp::parse(&created_at_str, "created_at")?,
		updated_at: timestamp::parse(&updated_at_str, "updated_at")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::credential::{CredentialRecord, CredentialRepository};
	use crate::testing::{create_test_pool, insert_test_user};
	use botgate_server_auth::Provider;

	struct Fixture {
		pool: SqlitePool,
		repo: BotRepository,
		alice: UserId,
		bob: UserId,
	}

	async fn setup() -> Fixture {
		let pool = create_test_pool().await;
		let alice = insert_test_user(&pool, "alice@example.com").await;
		let bob = insert_test_user(&pool, "bob@example.com").await;
		Fixture {
			repo: BotRepository::new(pool.clone()),
			pool,
			alice,
			bob,
		}
	}

	async fn insert_credential(pool: &SqlitePool, owner: UserId) -> CredentialId {
		let record = CredentialRecord::new(
			owner,
			Provider::Anthropic,
			"key",
			"v1:x".to_string(),
			"***".to_string(),
		);
		CredentialRepository::new(pool.clone())
			.create_credential(&record)
			.await
			.unwrap();
		record.id
	}

	fn changes(name: &str, api_key_id: Option<Option<CredentialId>>) -> BotChanges {
		BotChanges {
			name: name.to_string(),
			description: Some("helpful".to_string()),
			api_key_id,
		}
	}

	mod crud {
		use super::*;

		#[tokio::test]
		async fn create_and_get() {
			let f = setup().await;
			let bot = Bot::new(f.alice, "Helper", Some("Be nice".to_string()), None);
			f.repo.create_bot(&bot).await.unwrap();

			let fetched = f.repo.get_bot_by_id(&bot.id).await.unwrap().unwrap();
			assert_eq!(fetched.name, "Helper");
			assert_eq!(fetched.description.as_deref(), Some("Be nice"));
			assert_eq!(fetched.api_key_id, None);
		}

		#[tokio::test]
		async fn list_orders_by_most_recently_updated() {
			let f = setup().await;
			let older = Bot::new(f.alice, "older", None, None);
			let newer = Bot::new(f.alice, "newer", None, None);
			f.repo.create_bot(&older).await.unwrap();
			f.repo.create_bot(&newer).await.unwrap();
			f.repo.create_bot(&Bot::new(f.bob, "bobs", None, None)).await.unwrap();

			f.repo
				.update_bot(&older.id, &f.alice, &changes("older", None))
				.await
				.unwrap()
				.unwrap();

			let names: Vec<_> = f
				.repo
				.list_bots_for_owner(&f.alice)
				.await
				.unwrap()
				.into_iter()
				.map(|b| b.name)
				.collect();
			assert_eq!(names, vec!["older", "newer"]);
		}

		#[tokio::test]
		async fn update_api_key_is_tri_state() {
			let f = setup().await;
			let cred = insert_credential(&f.pool, f.alice).await;
			let bot = Bot::new(f.alice, "b", None, Some(cred));
			f.repo.create_bot(&bot).await.unwrap();

			let kept = f
				.repo
				.update_bot(&bot.id, &f.alice, &changes("renamed", None))
				.await
				.unwrap()
				.unwrap();
			assert_eq!(kept.name, "renamed");
			assert_eq!(kept.api_key_id, Some(cred));

			let cleared = f
				.repo
				.update_bot(&bot.id, &f.alice, &changes("renamed", Some(None)))
				.await
				.unwrap()
				.unwrap();
			assert_eq!(cleared.api_key_id, None);

			let assigned = f
				.repo
				.update_bot(&bot.id, &f.alice, &changes("renamed", Some(Some(cred))))
				.await
				.unwrap()
				.unwrap();
			assert_eq!(assigned.api_key_id, Some(cred));
		}

		#[tokio::test]
		async fn deleting_credential_clears_bot_reference() {
			let f = setup().await;
			let cred = insert_credential(&f.pool, f.alice).await;
			let bot = Bot::new(f.alice, "b", None, Some(cred));
			f.repo.create_bot(&bot).await.unwrap();

			CredentialRepository::new(f.pool.clone())
				.delete_credential(&cred, &f.alice)
				.await
				.unwrap();

			let fetched = f.repo.get_bot_by_id(&bot.id).await.unwrap().unwrap();
			assert_eq!(fetched.api_key_id, None);
		}
	}

	mod owner_scoping {
		use super::*;

		#[tokio::test]
		async fn foreign_owner_cannot_update_or_delete() {
			let f = setup().await;
			let bot = Bot::new(f.alice, "mine", None, None);
			f.repo.create_bot(&bot).await.unwrap();

			assert!(f
				.repo
				.update_bot(&bot.id, &f.bob, &changes("theirs", None))
				.await
				.unwrap()
				.is_none());
			assert!(!f.repo.delete_bot(&bot.id, &f.bob).await.unwrap());

			let fetched = f.repo.get_bot_by_id(&bot.id).await.unwrap().unwrap();
			assert_eq!(fetched.name, "mine");
		}

		#[tokio::test]
		async fn owner_can_delete() {
			let f = setup().await;
			let bot = Bot::new(f.alice, "mine", None, None);
			f.repo.create_bot(&bot).await.unwrap();

			assert!(f.repo.delete_bot(&bot.id, &f.alice).await.unwrap());
			assert!(f.repo.get_bot_by_id(&bot.id).await.unwrap().is_none());
		}
	}
}
