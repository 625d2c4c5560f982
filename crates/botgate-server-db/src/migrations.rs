// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Embedded schema migrations.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const MIGRATIONS: &[(&str, &str)] = &[
	(
		"001_create_users",
		include_str!("../migrations/001_create_users.sql"),
	),
	(
		"002_create_credentials",
		include_str!("../migrations/002_create_credentials.sql"),
	),
	(
		"003_create_bots",
		include_str!("../migrations/003_create_bots.sql"),
	),
];

/// Run all database migrations.
///
/// Migrations are idempotent - safe to run on every startup.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for (name, sql) in MIGRATIONS {
		for stmt in sql.split(';').filter(|s| !is_blank(s)) {
			if let Err(e) = sqlx::query(stmt).execute(pool).await {
				if !e.to_string().contains("already exists") {
					return Err(e.into());
				}
			}
		}
		tracing::debug!(migration = name, "migration applied");
	}
	Ok(())
}

/// True when a statement fragment holds nothing but whitespace and comments.
fn is_blank(stmt: &str) -> bool {
	stmt
		.lines()
		.map(str::trim)
		.all(|line| line.is_empty() || line.starts_with("--"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn migrations_are_idempotent() {
		let pool = create_test_pool().await;
		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();

		let tables: Vec<String> =
			sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
				.fetch_all(&pool)
				.await
				.unwrap();
		assert!(tables.contains(&"users".to_string()));
		assert!(tables.contains(&"credentials".to_string()));
		assert!(tables.contains(&"bots".to_string()));
	}

	#[test]
	fn comment_only_fragments_are_blank() {
		assert!(is_blank("\n-- trailing comment\n"));
		assert!(!is_blank("-- header\nCREATE TABLE t (id TEXT)"));
	}
}
