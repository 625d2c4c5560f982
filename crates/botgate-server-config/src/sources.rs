// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LlmConfigLayer, LogFormat,
	LoggingConfigLayer,
};

/// Default system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/botgate/server.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: BOTGATE_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()),
			auth: Some(load_auth_from_env()),
			logging: Some(load_logging_from_env()?),
			llm: Some(load_llm_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T: FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("BOTGATE_SERVER_HOST"),
		port: env_parse("BOTGATE_SERVER_PORT", "u16")?,
	})
}

fn load_database_from_env() -> DatabaseConfigLayer {
	DatabaseConfigLayer {
		url: env_var("BOTGATE_SERVER_DATABASE_URL"),
	}
}

fn load_auth_from_env() -> AuthConfigLayer {
	AuthConfigLayer {
		dev_mode: env_bool("BOTGATE_SERVER_AUTH_DEV_MODE"),
		environment: env_var("BOTGATE_SERVER_ENV"),
		secure_cookies: env_bool("BOTGATE_SERVER_SECURE_COOKIES"),
		signups_disabled: env_bool("BOTGATE_SERVER_SIGNUPS_DISABLED"),
	}
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = env_var("BOTGATE_SERVER_LOG_FORMAT")
		.map(|v| {
			LogFormat::from_str(&v).map_err(|message| ConfigError::InvalidValue {
				key: "BOTGATE_SERVER_LOG_FORMAT".to_string(),
				message,
			})
		})
		.transpose()?;

	Ok(LoggingConfigLayer {
		level: env_var("BOTGATE_SERVER_LOG_LEVEL"),
		format,
	})
}

fn load_llm_from_env() -> Result<LlmConfigLayer, ConfigError> {
	Ok(LlmConfigLayer {
		timeout_secs: env_parse("BOTGATE_SERVER_LLM_TIMEOUT_SECS", "u64")?,
		max_tokens: env_parse("BOTGATE_SERVER_LLM_MAX_TOKENS", "u32")?,
		temperature: env_parse("BOTGATE_SERVER_LLM_TEMPERATURE", "f32")?,
		openai_base_url: env_var("BOTGATE_SERVER_OPENAI_BASE_URL"),
		openai_model: env_var("BOTGATE_SERVER_OPENAI_MODEL"),
		anthropic_base_url: env_var("BOTGATE_SERVER_ANTHROPIC_BASE_URL"),
		anthropic_model: env_var("BOTGATE_SERVER_ANTHROPIC_MODEL"),
		anthropic_version: env_var("BOTGATE_SERVER_ANTHROPIC_VERSION"),
		google_base_url: env_var("BOTGATE_SERVER_GOOGLE_BASE_URL"),
		google_model: env_var("BOTGATE_SERVER_GOOGLE_MODEL"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/config.toml").load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_sections() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[http]\nport = 9191\n\n[auth]\nsignups_disabled = true\n\n[llm]\ntimeout_secs = 12"
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.http.unwrap().port, Some(9191));
		assert_eq!(layer.auth.unwrap().signups_disabled, Some(true));
		assert_eq!(layer.llm.unwrap().timeout_secs, Some(12));
	}

	#[test]
	fn test_toml_source_parse_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[http]\nport = \"not a number\"").unwrap();
		assert!(matches!(
			TomlSource::new(file.path()).load(),
			Err(ConfigError::TomlParse { .. })
		));
	}

	#[test]
	fn test_env_parse_rejects_garbage() {
		std::env::set_var("BOTGATE_TEST_ENV_PARSE_U16", "seventy");
		let result: Result<Option<u16>, _> = env_parse("BOTGATE_TEST_ENV_PARSE_U16", "u16");
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
		std::env::remove_var("BOTGATE_TEST_ENV_PARSE_U16");
	}
}
