// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! botgate HTTP server.
//!
//! Users register, store encrypted API keys for LLM providers, configure bots
//! that reference those keys, and chat with a bot. The server decrypts the
//! bot's key only for the duration of the single upstream call.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod dispatcher;
pub mod error;
pub mod routes;
pub mod validation;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use botgate_server_config::ServerConfig;
pub use dispatcher::{ChatDispatcher, DispatchError, DEFAULT_SYSTEM_PROMPT};
pub use error::{ErrorResponse, ServerError};
