// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider API key HTTP handlers.
//!
//! These endpoints return metadata and a masked preview only, never the key
//! or its ciphertext.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use botgate_common_secret::SecretString;
use botgate_server_auth::CredentialId;
use botgate_server_db::CredentialChanges;
use botgate_server_secrets::SecretsError;

pub use botgate_server_api::api_keys::*;
pub use botgate_server_api::SuccessResponse;

use crate::{
	api::AppState,
	api_response::{bad_request, internal_error, not_found},
	auth_middleware::RequireAuth,
	impl_api_error_response, parse_id, parse_json,
};

impl_api_error_response!(ApiKeyErrorResponse);

const NOT_FOUND_MESSAGE: &str = "API key not found";

/// Map a vault error onto the response the caller may see.
fn vault_error_response(e: SecretsError) -> Response {
	match e {
		SecretsError::Validation(message) => {
			bad_request::<ApiKeyErrorResponse>("validation_error", message).into_response()
		}
		SecretsError::CredentialNotFound => {
			not_found::<ApiKeyErrorResponse>(NOT_FOUND_MESSAGE).into_response()
		}
		other => {
			tracing::error!(error = %other, "API key operation failed");
			internal_error::<ApiKeyErrorResponse>("Internal server error").into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/api/settings/api-keys",
    responses(
        (status = 200, description = "The caller's API keys, newest first", body = [ApiKeyResponse]),
        (status = 401, description = "Not authenticated", body = ApiKeyErrorResponse)
    ),
    tag = "api-keys"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id))]
pub async fn list_api_keys(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
) -> impl IntoResponse {
	match state.vault.list(&identity).await {
		Ok(records) => {
			let keys: Vec<ApiKeyResponse> = records.iter().map(ApiKeyResponse::from).collect();
			(StatusCode::OK, Json(keys)).into_response()
		}
		Err(e) => vault_error_response(e),
	}
}

#[utoipa::path(
    post,
    path = "/api/settings/api-keys",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "API key stored", body = ApiKeyResponse),
        (status = 400, description = "Missing field, name too long, or unknown provider", body = ApiKeyErrorResponse),
        (status = 401, description = "Not authenticated", body = ApiKeyErrorResponse)
    ),
    tag = "api-keys"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id))]
pub async fn create_api_key(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	payload: Result<Json<CreateApiKeyRequest>, JsonRejection>,
) -> impl IntoResponse {
	let payload = parse_json!(ApiKeyErrorResponse, payload);
	let secret = payload
		.api_key
		.unwrap_or_else(|| SecretString::new(String::new()));

	match state
		.vault
		.store(&identity, &payload.provider, &payload.name, &secret)
		.await
	{
		Ok(record) => (StatusCode::CREATED, Json(ApiKeyResponse::from(&record))).into_response(),
		Err(e) => vault_error_response(e),
	}
}

#[utoipa::path(
    patch,
    path = "/api/settings/api-keys/{id}",
    params(
        ("id" = String, Path, description = "API key ID")
    ),
    request_body = UpdateApiKeyRequest,
    responses(
        (status = 200, description = "API key updated", body = ApiKeyResponse),
        (status = 400, description = "Nothing to update, or invalid name", body = ApiKeyErrorResponse),
        (status = 401, description = "Not authenticated", body = ApiKeyErrorResponse),
        (status = 404, description = "API key not found", body = ApiKeyErrorResponse)
    ),
    tag = "api-keys"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id, %id))]
pub async fn update_api_key(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<UpdateApiKeyRequest>, JsonRejection>,
) -> impl IntoResponse {
	let credential_id = parse_id!(ApiKeyErrorResponse, CredentialId::parse(&id), NOT_FOUND_MESSAGE);
	let payload = parse_json!(ApiKeyErrorResponse, payload);

	let changes = CredentialChanges {
		name: payload.name,
		is_active: payload.is_active,
	};

	match state.vault.update(&identity, &credential_id, changes).await {
		Ok(record) => (StatusCode::OK, Json(ApiKeyResponse::from(&record))).into_response(),
		Err(e) => vault_error_response(e),
	}
}

#[utoipa::path(
    delete,
    path = "/api/settings/api-keys/{id}",
    params(
        ("id" = String, Path, description = "API key ID")
    ),
    responses(
        (status = 200, description = "API key deleted", body = SuccessResponse),
        (status = 401, description = "Not authenticated", body = ApiKeyErrorResponse),
        (status = 404, description = "API key not found", body = ApiKeyErrorResponse)
    ),
    tag = "api-keys"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id, %id))]
pub async fn delete_api_key(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let credential_id = parse_id!(ApiKeyErrorResponse, CredentialId::parse(&id), NOT_FOUND_MESSAGE);

	match state.vault.remove(&identity, &credential_id).await {
		Ok(()) => (StatusCode::OK, Json(SuccessResponse::ok())).into_response(),
		Err(e) => vault_error_response(e),
	}
}
