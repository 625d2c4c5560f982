// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test helpers: a migrated single-connection in-memory database.

use botgate_server_auth::{User, UserId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::migrations::run_migrations;
use crate::user::UserRepository;

pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str(":memory:")
		.unwrap()
		.foreign_keys(true)
		.create_if_missing(true);

	// One connection: every connection to :memory: is a separate database.
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await
		.expect("Failed to create test pool");

	run_migrations(&pool).await.expect("migrations");
	pool
}

pub async fn insert_test_user(pool: &SqlitePool, email: &str) -> UserId {
	let user = User::new(email, "$argon2id$test".to_string());
	UserRepository::new(pool.clone())
		.create_user(&user)
		.await
		.expect("insert user");
	user.id
}
