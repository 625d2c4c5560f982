// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the botgate server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`BOTGATE_SERVER_*`)
//! - Secrets loaded only from the environment, with `*_FILE` support
//!
//! # Usage
//!
//! ```ignore
//! use botgate_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use env::{load_secret_env, SecretEnvError};
pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use std::path::PathBuf;

use tracing::{debug, info};

/// Shortest accepted session signing key, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub logging: LoggingConfig,
	pub llm: LlmConfig,
	pub secrets: SecretsConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`BOTGATE_SERVER_*`)
/// 2. Config file (`/etc/botgate/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged, SecretsConfig::from_env()?)
}

/// Finalize a merged layer plus secrets into a validated config.
pub fn finalize(
	layer: ServerConfigLayer,
	secrets: SecretsConfig,
) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let llm = layer.llm.unwrap_or_default().finalize();

	validate_config(&auth, &llm, &secrets)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		environment = %auth.environment,
		dev_mode = auth.dev_mode,
		signups_disabled = auth.signups_disabled,
		llm_timeout_secs = llm.timeout_secs,
		cipher_key_configured = secrets.cipher_key.is_some(),
		session_secret_configured = secrets.session_secret.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		logging,
		llm,
		secrets,
	})
}

/// Validate cross-field configuration rules.
///
/// Outside dev mode both secrets are mandatory. A session secret, whenever
/// present, must be at least [`MIN_SESSION_SECRET_LEN`] bytes.
pub fn validate_config(
	auth: &AuthConfig,
	llm: &LlmConfig,
	secrets: &SecretsConfig,
) -> Result<(), ConfigError> {
	if auth.dev_mode && auth.is_production() {
		return Err(ConfigError::Validation(
			"BOTGATE_SERVER_AUTH_DEV_MODE=1 is set while BOTGATE_SERVER_ENV=production. \
			 This is a security risk. Remove BOTGATE_SERVER_AUTH_DEV_MODE or set \
			 BOTGATE_SERVER_ENV to a non-production value."
				.to_string(),
		));
	}

	if !auth.dev_mode {
		if secrets.cipher_key.is_none() {
			return Err(ConfigError::MissingSecret {
				var: CIPHER_KEY_VAR.to_string(),
			});
		}
		if secrets.session_secret.is_none() {
			return Err(ConfigError::MissingSecret {
				var: SESSION_SECRET_VAR.to_string(),
			});
		}
	}

	if let Some(secret) = &secrets.session_secret {
		if secret.expose().len() < MIN_SESSION_SECRET_LEN {
			return Err(ConfigError::InvalidValue {
				key: SESSION_SECRET_VAR.to_string(),
				message: format!("must be at least {MIN_SESSION_SECRET_LEN} bytes"),
			});
		}
	}

	if llm.timeout_secs == 0 {
		return Err(ConfigError::InvalidValue {
			key: "llm.timeout_secs".to_string(),
			message: "must be greater than zero".to_string(),
		});
	}
	if llm.max_tokens == 0 {
		return Err(ConfigError::InvalidValue {
			key: "llm.max_tokens".to_string(),
			message: "must be greater than zero".to_string(),
		});
	}

	Ok(())
}
