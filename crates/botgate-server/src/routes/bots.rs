// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bot HTTP handlers.
//!
//! A bot is a named system prompt bound to at most one of the caller's API
//! keys. Every lookup goes through the ownership guard, so another user's bot
//! is indistinguishable from a missing one.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use botgate_server_auth::{BotId, CredentialId, Identity};
use botgate_server_db::{Bot, BotChanges, DbError};

pub use botgate_server_api::bots::*;
pub use botgate_server_api::SuccessResponse;

use crate::{
	api::AppState,
	api_response::{internal_error, not_found},
	auth_middleware::RequireAuth,
	impl_api_error_response, parse_id, parse_json, validate_or_error,
	validation::{normalize_description, normalize_reference, validate_bot_name},
};

impl_api_error_response!(BotErrorResponse);

const NOT_FOUND_MESSAGE: &str = "Bot not found";
const API_KEY_NOT_FOUND_MESSAGE: &str = "API key not found";

fn db_error_response(e: DbError, context: &str) -> Response {
	match e {
		DbError::NotFound(_) => not_found::<BotErrorResponse>(NOT_FOUND_MESSAGE).into_response(),
		other => {
			tracing::error!(error = %other, "{context}");
			internal_error::<BotErrorResponse>("Internal server error").into_response()
		}
	}
}

/// Resolve an optional credential reference to a credential the caller owns.
///
/// Blank references mean "no credential". A reference that is malformed,
/// missing, or owned by someone else is a 404.
async fn resolve_api_key(
	state: &AppState,
	identity: &Identity,
	reference: Option<&str>,
) -> Result<Option<CredentialId>, Response> {
	let Some(reference) = normalize_reference(reference) else {
		return Ok(None);
	};
	let Some(credential_id) = CredentialId::parse(reference) else {
		return Err(not_found::<BotErrorResponse>(API_KEY_NOT_FOUND_MESSAGE).into_response());
	};

	match state.guard.authorize_credential(identity, &credential_id).await {
		Ok(record) => Ok(Some(record.id)),
		Err(DbError::NotFound(_)) => {
			Err(not_found::<BotErrorResponse>(API_KEY_NOT_FOUND_MESSAGE).into_response())
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to resolve bot API key");
			Err(internal_error::<BotErrorResponse>("Internal server error").into_response())
		}
	}
}

#[utoipa::path(
    get,
    path = "/api/bots",
    responses(
        (status = 200, description = "The caller's bots, most recently updated first", body = [BotResponse]),
        (status = 401, description = "Not authenticated", body = BotErrorResponse)
    ),
    tag = "bots"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id))]
pub async fn list_bots(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
) -> impl IntoResponse {
	match state.bot_repo.list_bots_for_owner(&identity.user_id).await {
		Ok(bots) => {
			let bots: Vec<BotResponse> = bots.iter().map(BotResponse::from).collect();
			(StatusCode::OK, Json(bots)).into_response()
		}
		Err(e) => db_error_response(e, "Failed to list bots"),
	}
}

#[utoipa::path(
    post,
    path = "/api/bots",
    request_body = CreateBotRequest,
    responses(
        (status = 201, description = "Bot created", body = BotResponse),
        (status = 400, description = "Invalid name or description", body = BotErrorResponse),
        (status = 401, description = "Not authenticated", body = BotErrorResponse),
        (status = 404, description = "API key not found", body = BotErrorResponse)
    ),
    tag = "bots"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id))]
pub async fn create_bot(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	payload: Result<Json<CreateBotRequest>, JsonRejection>,
) -> impl IntoResponse {
	let payload = parse_json!(BotErrorResponse, payload);
	let name = validate_or_error!(BotErrorResponse, validate_bot_name(&payload.name));
	let description = validate_or_error!(
		BotErrorResponse,
		normalize_description(payload.description.as_deref())
	);

	let api_key_id = match resolve_api_key(&state, &identity, payload.api_key_id.as_deref()).await {
		Ok(id) => id,
		Err(resp) => return resp,
	};

	let bot = Bot::new(identity.user_id, name, description, api_key_id);
	if let Err(e) = state.bot_repo.create_bot(&bot).await {
		return db_error_response(e, "Failed to create bot");
	}

	tracing::info!(bot_id = %bot.id, "bot created");
	(StatusCode::CREATED, Json(BotResponse::from(&bot))).into_response()
}

#[utoipa::path(
    get,
    path = "/api/bots/{id}",
    params(
        ("id" = String, Path, description = "Bot ID")
    ),
    responses(
        (status = 200, description = "The bot", body = BotResponse),
        (status = 401, description = "Not authenticated", body = BotErrorResponse),
        (status = 404, description = "Bot not found", body = BotErrorResponse)
    ),
    tag = "bots"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id, %id))]
pub async fn get_bot(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let bot_id = parse_id!(BotErrorResponse, BotId::parse(&id), NOT_FOUND_MESSAGE);

	match state.guard.authorize_bot(&identity, &bot_id).await {
		Ok(bot) => (StatusCode::OK, Json(BotResponse::from(&bot))).into_response(),
		Err(e) => db_error_response(e, "Failed to get bot"),
	}
}

#[utoipa::path(
    put,
    path = "/api/bots/{id}",
    params(
        ("id" = String, Path, description = "Bot ID")
    ),
    request_body = UpdateBotRequest,
    responses(
        (status = 200, description = "Bot updated", body = BotResponse),
        (status = 400, description = "Invalid name or description", body = BotErrorResponse),
        (status = 401, description = "Not authenticated", body = BotErrorResponse),
        (status = 404, description = "Bot or API key not found", body = BotErrorResponse)
    ),
    tag = "bots"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id, %id))]
pub async fn update_bot(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<UpdateBotRequest>, JsonRejection>,
) -> impl IntoResponse {
	let bot_id = parse_id!(BotErrorResponse, BotId::parse(&id), NOT_FOUND_MESSAGE);
	let payload = parse_json!(BotErrorResponse, payload);

	if let Err(e) = state.guard.authorize_bot(&identity, &bot_id).await {
		return db_error_response(e, "Failed to get bot");
	}

	let name = validate_or_error!(BotErrorResponse, validate_bot_name(&payload.name));
	let description = validate_or_error!(
		BotErrorResponse,
		normalize_description(payload.description.as_deref())
	);

	let api_key_id = match payload.api_key_id.as_ref() {
		None => None,
		Some(reference) => match resolve_api_key(&state, &identity, reference.as_deref()).await {
			Ok(id) => Some(id),
			Err(resp) => return resp,
		},
	};

	let changes = BotChanges {
		name,
		description,
		api_key_id,
	};

	match state
		.bot_repo
		.update_bot(&bot_id, &identity.user_id, &changes)
		.await
	{
		Ok(Some(bot)) => (StatusCode::OK, Json(BotResponse::from(&bot))).into_response(),
		Ok(None) => not_found::<BotErrorResponse>(NOT_FOUND_MESSAGE).into_response(),
		Err(e) => db_error_response(e, "Failed to update bot"),
	}
}

#[utoipa::path(
    delete,
    path = "/api/bots/{id}",
    params(
        ("id" = String, Path, description = "Bot ID")
    ),
    responses(
        (status = 200, description = "Bot deleted", body = SuccessResponse),
        (status = 401, description = "Not authenticated", body = BotErrorResponse),
        (status = 404, description = "Bot not found", body = BotErrorResponse)
    ),
    tag = "bots"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id, %id))]
pub async fn delete_bot(
	RequireAuth(identity): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let bot_id = parse_id!(BotErrorResponse, BotId::parse(&id), NOT_FOUND_MESSAGE);

	if let Err(e) = state.guard.authorize_bot(&identity, &bot_id).await {
		return db_error_response(e, "Failed to get bot");
	}

	match state.bot_repo.delete_bot(&bot_id, &identity.user_id).await {
		Ok(true) => {
			tracing::info!(bot_id = %bot_id, "bot deleted");
			(StatusCode::OK, Json(SuccessResponse::ok())).into_response()
		}
		Ok(false) => not_found::<BotErrorResponse>(NOT_FOUND_MESSAGE).into_response(),
		Err(e) => db_error_response(e, "Failed to delete bot"),
	}
}
