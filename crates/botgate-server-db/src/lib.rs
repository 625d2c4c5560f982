// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record store for botgate.
//!
//! This crate owns the SQLite schema and every query the server runs. It
//! follows the repository pattern:
//!
//! - Each entity has a `*Store` trait (`Send + Sync`, `#[async_trait]`) and a
//!   `*Repository` struct holding a [`sqlx::SqlitePool`]. The trait impl
//!   delegates to the repository's inherent, instrumented methods, so the
//!   server can hold `Arc<dyn *Store>` and tests can substitute their own.
//! - Lookups return `Result<Option<T>>`; a missing row is not an error.
//! - Mutations on owned records take both the record id and the owner id and
//!   are conditional on both (`WHERE id = ? AND owner_id = ?`). They return
//!   `Option<T>` / `bool` so "not yours" and "not there" look the same.
//! - Timestamps are stored as RFC 3339 strings with microsecond precision, so
//!   `ORDER BY` on the text column is chronological.
//!
//! [`OwnershipGuard`] sits on top of the bot and credential stores and is the
//! single place where "fetch by id, then confirm the caller owns it" happens.

pub mod bot;
pub mod credential;
pub mod error;
pub mod migrations;
pub mod ownership;
pub mod pool;
mod timestamp;
pub mod user;

#[cfg(test)]
pub mod testing;

pub use bot::{Bot, BotChanges, BotRepository, BotStore};
pub use credential::{CredentialChanges, CredentialRecord, CredentialRepository, CredentialStore};
pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use ownership::OwnershipGuard;
pub use pool::{create_pool, ping};
pub use user::{UserRepository, UserStore};
