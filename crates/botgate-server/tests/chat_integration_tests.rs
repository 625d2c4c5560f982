// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for `/api/bots/{id}/chat`.
//!
//! Provider endpoints are replaced with wiremock servers through the LLM
//! base URL settings, so these tests exercise the full path from session
//! cookie to upstream request.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::{setup_test_app_with, test_config, TestApp};
use wiremock::{
	matchers::{body_partial_json, header, method, path, query_param},
	Mock, MockServer, ResponseTemplate,
};

const OPENAI_KEY: &str = "sk-test-openai-0123456789";

async fn app_with_upstream(server: &MockServer) -> TestApp {
	let mut config = test_config();
	config.llm.openai_base_url = server.uri();
	config.llm.anthropic_base_url = server.uri();
	config.llm.google_base_url = server.uri();
	setup_test_app_with(config).await
}

fn chat_uri(bot_id: &str) -> String {
	format!("/api/bots/{bot_id}/chat")
}

#[tokio::test]
async fn chat_forwards_to_openai_with_stored_key() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/chat/completions"))
		.and(header("authorization", format!("Bearer {OPENAI_KEY}").as_str()))
		.and(body_partial_json(json!({
			"messages": [
				{"role": "system", "content": "Answer in one sentence."},
				{"role": "user", "content": "What is Rust?"}
			]
		})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"choices": [{"message": {"role": "assistant", "content": "A systems language."}}]
		})))
		.expect(1)
		.mount(&server)
		.await;

	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("chat@example.com").await;
	let key_id = app.add_api_key(&token, "openai", OPENAI_KEY).await;
	let bot_id = app.add_bot(&token, Some(&key_id)).await;

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "What is Rust?"}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::OK, "{}", resp.raw);
	assert_eq!(resp.body["message"], "A systems language.");
	assert_eq!(resp.body["provider"], "openai");
	assert!(resp.body["model"].is_string());
	assert!(!resp.raw.contains(OPENAI_KEY));
}

#[tokio::test]
async fn chat_uses_default_prompt_without_description() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/messages"))
		.and(header("x-api-key", "sk-ant-test-0123456789"))
		.and(body_partial_json(json!({
			"system": "You are a helpful and capable AI assistant."
		})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"content": [{"type": "text", "text": "Hello from Claude"}]
		})))
		.expect(1)
		.mount(&server)
		.await;

	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("anthropic@example.com").await;
	let key_id = app
		.add_api_key(&token, "anthropic", "sk-ant-test-0123456789")
		.await;
	let bot = app
		.post("/api/bots", json!({"name": "Plain", "apiKeyId": key_id}), &token)
		.await;
	let bot_id = bot.body["id"].as_str().unwrap();

	let resp = app
		.post(&chat_uri(bot_id), json!({"message": "hi"}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::OK, "{}", resp.raw);
	assert_eq!(resp.body["message"], "Hello from Claude");
	assert_eq!(resp.body["provider"], "anthropic");
}

#[tokio::test]
async fn chat_forwards_to_google() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(query_param("key", "AIza-test-0123456789"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"candidates": [{"content": {"role": "model", "parts": [{"text": "Hi there"}]}}]
		})))
		.expect(1)
		.mount(&server)
		.await;

	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("google@example.com").await;
	let key_id = app.add_api_key(&token, "google", "AIza-test-0123456789").await;
	let bot_id = app.add_bot(&token, Some(&key_id)).await;

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "hello"}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::OK, "{}", resp.raw);
	assert_eq!(resp.body["message"], "Hi there");
	assert_eq!(resp.body["provider"], "google");
}

#[tokio::test]
async fn upstream_failure_is_generic() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({
			"error": {"message": format!("Incorrect API key provided: {OPENAI_KEY}")}
		})))
		.expect(1)
		.mount(&server)
		.await;

	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("upstream@example.com").await;
	let key_id = app.add_api_key(&token, "openai", OPENAI_KEY).await;
	let bot_id = app.add_bot(&token, Some(&key_id)).await;

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "hi"}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(resp.body["error"], "provider_error");
	assert!(!resp.raw.contains(OPENAI_KEY));
	assert!(!resp.raw.contains("Incorrect API key"));
}

#[tokio::test]
async fn chat_without_api_key_is_rejected() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(200))
		.expect(0)
		.mount(&server)
		.await;

	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("nokey@example.com").await;
	let bot_id = app.add_bot(&token, None).await;

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "hi"}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::BAD_REQUEST);
	assert_eq!(resp.body["error"], "no_api_key");
}

#[tokio::test]
async fn chat_with_inactive_api_key_is_rejected() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(200))
		.expect(0)
		.mount(&server)
		.await;

	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("inactive@example.com").await;
	let key_id = app.add_api_key(&token, "openai", OPENAI_KEY).await;
	let bot_id = app.add_bot(&token, Some(&key_id)).await;
	app.request(
		Method::PATCH,
		&format!("/api/settings/api-keys/{key_id}"),
		Some(json!({"isActive": false})),
		Some(&token),
	)
	.await;

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "hi"}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::BAD_REQUEST);
	assert_eq!(resp.body["error"], "no_api_key");
}

#[tokio::test]
async fn chat_with_unsupported_provider_is_rejected() {
	let server = MockServer::start().await;
	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("azure@example.com").await;
	let key_id = app.add_api_key(&token, "azure", "azure-key-0123456789").await;
	let bot_id = app.add_bot(&token, Some(&key_id)).await;

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "hi"}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::BAD_REQUEST);
	assert_eq!(resp.body["error"], "unsupported_provider");
}

#[tokio::test]
async fn chat_requires_message() {
	let server = MockServer::start().await;
	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("empty@example.com").await;
	let bot_id = app.add_bot(&token, None).await;

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "   "}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::BAD_REQUEST);
	assert_eq!(resp.body["error"], "validation_error");
}

#[tokio::test]
async fn chat_with_foreign_bot_is_not_found() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(200))
		.expect(0)
		.mount(&server)
		.await;

	let app = app_with_upstream(&server).await;
	let owner = app.signed_in_user("chatowner@example.com").await;
	let intruder = app.signed_in_user("chatintruder@example.com").await;
	let key_id = app.add_api_key(&owner, "openai", OPENAI_KEY).await;
	let bot_id = app.add_bot(&owner, Some(&key_id)).await;

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "hi"}), &intruder)
		.await;

	assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_requires_session() {
	let server = MockServer::start().await;
	let app = app_with_upstream(&server).await;

	let resp = app
		.request(
			Method::POST,
			"/api/bots/00000000-0000-0000-0000-000000000000/chat",
			Some(json!({"message": "hi"})),
			None,
		)
		.await;

	assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_completion_returns_fallback_text() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/chat/completions"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"choices": [{"message": {"role": "assistant", "content": ""}}]
		})))
		.expect(1)
		.mount(&server)
		.await;

	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("fallback@example.com").await;
	let key_id = app.add_api_key(&token, "openai", OPENAI_KEY).await;
	let bot_id = app.add_bot(&token, Some(&key_id)).await;

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "hi"}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::OK, "{}", resp.raw);
	assert_eq!(resp.body["message"], "Could not get a response from the model.");
	assert_eq!(resp.body["provider"], "openai");
}

#[tokio::test]
async fn undecryptable_credential_is_generic_internal_error() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(200))
		.expect(0)
		.mount(&server)
		.await;

	let app = app_with_upstream(&server).await;
	let token = app.signed_in_user("corrupt@example.com").await;
	let key_id = app.add_api_key(&token, "openai", OPENAI_KEY).await;
	let bot_id = app.add_bot(&token, Some(&key_id)).await;

	// Well-formed, but not sealed under this server's key.
	let foreign_ciphertext = format!("v1:{}", "A".repeat(52));
	sqlx::query("UPDATE credentials SET ciphertext = ? WHERE id = ?")
		.bind(&foreign_ciphertext)
		.bind(&key_id)
		.execute(&app.state.pool)
		.await
		.unwrap();

	let resp = app
		.post(&chat_uri(&bot_id), json!({"message": "hi"}), &token)
		.await;

	assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(resp.body["error"], "internal_error");
	assert_eq!(resp.body["message"], "Internal server error");
	assert!(!resp.raw.contains("decrypt"));
	assert!(!resp.raw.contains(OPENAI_KEY));
}
