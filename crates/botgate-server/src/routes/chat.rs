// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Chat HTTP handler.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use botgate_server_auth::BotId;
use botgate_server_llm::ProviderError;

pub use botgate_server_api::chat::*;

use crate::{
	api::AppState,
	api_response::{bad_request, internal_error, not_found},
	auth_middleware::RequireAuth,
	dispatcher::{DispatchError, PROVIDER_FAILURE_MESSAGE},
	impl_api_error_response, parse_id, parse_json,
};

impl_api_error_response!(ChatErrorResponse);

const NOT_FOUND_MESSAGE: &str = "Bot not found";

/// Map a dispatch failure onto the response the caller may see.
///
/// Upstream failures all collapse into one message; the detail goes to the
/// log only, and it never includes the key or the upstream body.
fn dispatch_error_response(e: DispatchError) -> Response {
	if e.is_internal() {
		tracing::error!(error = %e, "chat dispatch failed");
	}

	match e {
		DispatchError::EmptyMessage => {
			bad_request::<ChatErrorResponse>("validation_error", "Message is required").into_response()
		}
		DispatchError::BotNotFound => not_found::<ChatErrorResponse>(NOT_FOUND_MESSAGE).into_response(),
		DispatchError::NoCredential => bad_request::<ChatErrorResponse>(
			"no_api_key",
			"No API key is configured for this bot",
		)
		.into_response(),
		DispatchError::Provider(ProviderError::Unsupported(provider)) => {
			bad_request::<ChatErrorResponse>(
				"unsupported_provider",
				format!("Provider {provider} is not supported for chat"),
			)
			.into_response()
		}
		DispatchError::Provider(_) => (
			StatusCode::INTERNAL_SERVER_ERROR,
			Json(ChatErrorResponse {
				error: "provider_error".to_string(),
				message: PROVIDER_FAILURE_MESSAGE.to_string(),
			}),
		)
			.into_response(),
		DispatchError::Credential(_) | DispatchError::Database(_) => {
			internal_error::<ChatErrorResponse>("Internal server error").into_response()
		}
	}
}

#[utoipa::path(
    post,
    path = "/api/bots/{id}/chat",
    params(
        ("id" = String, Path, description = "Bot ID")
    ),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The model's reply", body = ChatResponse),
        (status = 400, description = "Empty message, no API key, or unsupported provider", body = ChatErrorResponse),
        (status = 401, description = "Not authenticated", body = ChatErrorResponse),
        (status = 404, description = "Bot not found", body = ChatErrorResponse),
        (status = 500, description = "The provider call failed", body = ChatErrorResponse)
    ),
    tag = "chat"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id, %id))]
pub async fn chat(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<ChatRequest>, JsonRejection>,
) -> impl IntoResponse {
	let payload = parse_json!(ChatErrorResponse, payload);
	if payload.message.trim().is_empty() {
		return dispatch_error_response(DispatchError::EmptyMessage);
	}
	let bot_id = parse_id!(ChatErrorResponse, BotId::parse(&id), NOT_FOUND_MESSAGE);

	match state
		.dispatcher
		.dispatch(&identity, &bot_id, &payload.message)
		.await
	{
		Ok(result) => (
			StatusCode::OK,
			Json(ChatResponse {
				message: result.text,
				provider: result.provider.to_string(),
				model: result.model,
			}),
		)
			.into_response(),
		Err(e) => dispatch_error_response(e),
	}
}
