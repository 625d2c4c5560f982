// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::{sync::Arc, time::Duration};

use axum::{
	middleware::from_fn_with_state,
	routing::{get, patch, post},
	Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use botgate_common_secret::SecretString;
use botgate_server_auth::{AuthConfig, SessionAuthenticator};
use botgate_server_config::{ConfigError, LlmConfig, ServerConfig, CIPHER_KEY_VAR, SESSION_SECRET_VAR};
use botgate_server_db::{BotRepository, CredentialRepository, OwnershipGuard, UserRepository};
use botgate_server_llm::{
	AnthropicConfig, GoogleConfig, OpenAiConfig, ProviderRegistry,
};
use botgate_server_secrets::{generate_key, CredentialVault, SecretCipher};
use sqlx::SqlitePool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
	auth_middleware::auth_layer, dispatcher::ChatDispatcher, error::ServerError, routes,
};

/// Application state shared across handlers.
///
/// Every field is an `Arc` or a cheap clone around one, so cloning per request
/// costs a handful of reference-count bumps.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub user_repo: Arc<UserRepository>,
	pub bot_repo: Arc<BotRepository>,
	pub guard: OwnershipGuard,
	pub vault: CredentialVault,
	pub sessions: Arc<SessionAuthenticator>,
	pub dispatcher: ChatDispatcher,
	pub auth_config: AuthConfig,
}

/// Build the application state from a migrated pool and loaded configuration.
///
/// # Errors
/// - `Config(MissingSecret)` if a key is absent outside dev mode
/// - `Secrets` if the cipher key is not base64 of 32 bytes
/// - `Auth` if the session secret is too short
/// - `HttpClient` if the upstream client cannot be built
pub async fn create_app_state(
	pool: SqlitePool,
	config: &ServerConfig,
) -> Result<AppState, ServerError> {
	let dev_mode = config.auth.dev_mode;

	let cipher = match &config.secrets.cipher_key {
		Some(key) => SecretCipher::from_base64(key)?,
		None if dev_mode => {
			tracing::warn!(
				"{CIPHER_KEY_VAR} not set; using an ephemeral cipher key. \
				 Stored API keys will be unreadable after restart."
			);
			SecretCipher::ephemeral()
		}
		None => {
			return Err(ConfigError::MissingSecret {
				var: CIPHER_KEY_VAR.to_string(),
			}
			.into())
		}
	};

	let session_secret = match &config.secrets.session_secret {
		Some(secret) => secret.clone(),
		None if dev_mode => {
			tracing::warn!(
				"{SESSION_SECRET_VAR} not set; using an ephemeral session key. \
				 Sessions will not survive a restart."
			);
			SecretString::new(BASE64.encode(generate_key().as_slice()))
		}
		None => {
			return Err(ConfigError::MissingSecret {
				var: SESSION_SECRET_VAR.to_string(),
			}
			.into())
		}
	};
	let sessions = Arc::new(SessionAuthenticator::new(&session_secret)?);

	let auth_config = AuthConfig::new()
		.with_dev_mode(dev_mode)
		.with_secure_cookies(config.auth.secure_cookies)
		.with_signups_disabled(config.auth.signups_disabled);

	let user_repo = Arc::new(UserRepository::new(pool.clone()));
	let bot_repo = Arc::new(BotRepository::new(pool.clone()));
	let credential_repo = Arc::new(CredentialRepository::new(pool.clone()));

	let guard = OwnershipGuard::new(bot_repo.clone(), credential_repo.clone());
	let vault = CredentialVault::new(Arc::new(cipher), credential_repo, guard.clone());

	let registry = create_provider_registry(&config.llm)?;
	let dispatcher = ChatDispatcher::new(guard.clone(), vault.clone(), Arc::new(registry));

	tracing::info!(
		dev_mode,
		secure_cookies = auth_config.secure_cookies,
		signups_disabled = auth_config.signups_disabled,
		"application state ready"
	);

	Ok(AppState {
		pool,
		user_repo,
		bot_repo,
		guard,
		vault,
		sessions,
		dispatcher,
		auth_config,
	})
}

/// One shared upstream client with the configured timeout, and the three
/// supported adapters on top of it.
fn create_provider_registry(llm: &LlmConfig) -> Result<ProviderRegistry, ServerError> {
	let client = botgate_common_http::new_client_with_timeout(Duration::from_secs(llm.timeout_secs))
		.map_err(|e| ServerError::HttpClient(e.without_url().to_string()))?;

	Ok(ProviderRegistry::standard(
		client,
		OpenAiConfig::default()
			.with_base_url(&llm.openai_base_url)
			.with_model(&llm.openai_model)
			.with_max_tokens(llm.max_tokens)
			.with_temperature(llm.temperature),
		AnthropicConfig::default()
			.with_base_url(&llm.anthropic_base_url)
			.with_model(&llm.anthropic_model)
			.with_max_tokens(llm.max_tokens)
			.with_api_version(&llm.anthropic_version),
		GoogleConfig::default()
			.with_base_url(&llm.google_base_url)
			.with_model(&llm.google_model)
			.with_max_tokens(llm.max_tokens),
	))
}

/// Build the application router.
///
/// Every route runs behind [`auth_layer`]; handlers that need a user take the
/// `RequireAuth` extractor.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		// Public routes
		.route("/health", get(routes::health::health_check))
		.route("/api/auth/register", post(routes::auth::register))
		.route("/api/auth/login", post(routes::auth::login))
		.route("/api/auth/logout", post(routes::auth::logout))
		// Session routes
		.route("/api/auth/me", get(routes::auth::me))
		.route(
			"/api/settings/api-keys",
			get(routes::api_keys::list_api_keys).post(routes::api_keys::create_api_key),
		)
		.route(
			"/api/settings/api-keys/{id}",
			patch(routes::api_keys::update_api_key).delete(routes::api_keys::delete_api_key),
		)
		.route(
			"/api/bots",
			get(routes::bots::list_bots).post(routes::bots::create_bot),
		)
		.route(
			"/api/bots/{id}",
			get(routes::bots::get_bot)
				.put(routes::bots::update_bot)
				.delete(routes::bots::delete_bot),
		)
		.route("/api/bots/{id}/chat", post(routes::chat::chat))
		// OpenAPI documentation
		.merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", crate::api_docs::ApiDoc::openapi()))
		.fallback(routes::not_found)
		.layer(from_fn_with_state(state.clone(), auth_layer))
		.with_state(state)
}
