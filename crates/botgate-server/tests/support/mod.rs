// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared harness for botgate-server integration tests.

#![allow(dead_code)]

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	Router,
};
use botgate_common_secret::SecretString;
use botgate_server::{create_app_state, create_router, AppState, ServerConfig};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Base64 of the bytes 0..32, a valid AES-256 key for tests.
pub const TEST_CIPHER_KEY: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";
pub const TEST_SESSION_SECRET: &str = "integration-test-session-secret-0123456789";
pub const TEST_PASSWORD: &str = "correct horse battery";

pub struct TestApp {
	pub router: Router,
	pub state: AppState,
	_dir: TempDir,
}

pub struct TestResponse {
	pub status: StatusCode,
	pub set_cookie: Option<String>,
	pub body: Value,
	pub raw: String,
}

/// A configuration with real secrets and dev mode off.
pub fn test_config() -> ServerConfig {
	let mut config = ServerConfig::default();
	config.auth.dev_mode = false;
	config.secrets.cipher_key = Some(SecretString::from(TEST_CIPHER_KEY));
	config.secrets.session_secret = Some(SecretString::from(TEST_SESSION_SECRET));
	config
}

/// Creates a test app with an isolated database.
pub async fn setup_test_app() -> TestApp {
	setup_test_app_with(test_config()).await
}

pub async fn setup_test_app_with(mut config: ServerConfig) -> TestApp {
	let dir = tempfile::tempdir().unwrap();
	let db_path = dir.path().join("botgate_test.db");
	config.database.url = format!("sqlite:{}?mode=rwc", db_path.display());

	let pool = botgate_server_db::create_pool(&config.database.url)
		.await
		.unwrap();
	botgate_server_db::run_migrations(&pool).await.unwrap();

	let state = create_app_state(pool, &config).await.unwrap();
	TestApp {
		router: create_router(state.clone()),
		state,
		_dir: dir,
	}
}

impl TestApp {
	pub async fn request(
		&self,
		method: Method,
		uri: &str,
		body: Option<Value>,
		token: Option<&str>,
	) -> TestResponse {
		let mut builder = Request::builder().method(method).uri(uri);
		if let Some(token) = token {
			builder = builder.header(header::COOKIE, format!("session={token}"));
		}
		let body = match body {
			Some(json) => {
				builder = builder.header(header::CONTENT_TYPE, "application/json");
				Body::from(json.to_string())
			}
			None => Body::empty(),
		};
		self.send(builder.body(body).unwrap()).await
	}

	pub async fn send(&self, request: Request<Body>) -> TestResponse {
		let response = self.router.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let set_cookie = response
			.headers()
			.get(header::SET_COOKIE)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let raw = String::from_utf8_lossy(&bytes).into_owned();
		let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
		TestResponse {
			status,
			set_cookie,
			body,
			raw,
		}
	}

	pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
		self.request(Method::GET, uri, None, Some(token)).await
	}

	pub async fn post(&self, uri: &str, body: Value, token: &str) -> TestResponse {
		self.request(Method::POST, uri, Some(body), Some(token)).await
	}

	/// Registers an account and logs in, returning the session token.
	pub async fn signed_in_user(&self, email: &str) -> String {
		let credentials = serde_json::json!({"email": email, "password": TEST_PASSWORD});
		let registered = self
			.request(
				Method::POST,
				"/api/auth/register",
				Some(credentials.clone()),
				None,
			)
			.await;
		assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.raw);

		let login = self
			.request(Method::POST, "/api/auth/login", Some(credentials), None)
			.await;
		assert_eq!(login.status, StatusCode::OK, "{}", login.raw);
		session_token(login.set_cookie.as_deref().unwrap())
	}

	/// Stores an API key for the user and returns its id.
	pub async fn add_api_key(&self, token: &str, provider: &str, secret: &str) -> String {
		let created = self
			.post(
				"/api/settings/api-keys",
				serde_json::json!({"provider": provider, "name": "Primary", "apiKey": secret}),
				token,
			)
			.await;
		assert_eq!(created.status, StatusCode::CREATED, "{}", created.raw);
		created.body["id"].as_str().unwrap().to_string()
	}

	/// Creates a bot bound to the given key and returns its id.
	pub async fn add_bot(&self, token: &str, api_key_id: Option<&str>) -> String {
		let created = self
			.post(
				"/api/bots",
				serde_json::json!({
					"name": "Helper",
					"description": "Answer in one sentence.",
					"apiKeyId": api_key_id,
				}),
				token,
			)
			.await;
		assert_eq!(created.status, StatusCode::CREATED, "{}", created.raw);
		created.body["id"].as_str().unwrap().to_string()
	}
}

/// Extracts the session token from a `Set-Cookie` header value.
pub fn session_token(set_cookie: &str) -> String {
	set_cookie
		.split(';')
		.next()
		.and_then(|pair| pair.trim().strip_prefix("session="))
		.unwrap()
		.to_string()
}
