// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account HTTP handlers: register, login, logout, and the current user.
//!
//! Login issues a stateless session token in an `HttpOnly` cookie. Logout
//! only expires the cookie; there is no server-side session to revoke.

use axum::{
	extract::{rejection::JsonRejection, State},
	http::{header::SET_COOKIE, StatusCode},
	response::IntoResponse,
	Json,
};
use botgate_server_auth::{
	clear_session_cookie, hash_password, session_cookie, verify_password,
	verify_password_for_unknown_user, User,
};
use botgate_server_db::DbError;

pub use botgate_server_api::auth::*;
pub use botgate_server_api::SuccessResponse;

use crate::{
	api::AppState,
	api_response::{conflict, forbidden, internal_error, unauthorized},
	auth_middleware::RequireAuth,
	impl_api_error_response, parse_json, validate_or_error,
	validation::{require_login_fields, validate_password},
};

impl_api_error_response!(AuthErrorResponse);

const INVALID_LOGIN_MESSAGE: &str = "Email or password is incorrect";

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthSuccessResponse),
        (status = 400, description = "Missing email or password, or password too short", body = AuthErrorResponse),
        (status = 403, description = "Signups are disabled", body = AuthErrorResponse),
        (status = 409, description = "Email already registered", body = AuthErrorResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn register(
	State(state): State<AppState>,
	payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> impl IntoResponse {
	if state.auth_config.signups_disabled {
		return forbidden::<AuthErrorResponse>("signups_disabled", "Signups are disabled")
			.into_response();
	}

	let payload = parse_json!(AuthErrorResponse, payload);
	let (email, password) = validate_or_error!(
		AuthErrorResponse,
		require_login_fields(&payload.email, payload.password)
	);
	validate_or_error!(AuthErrorResponse, validate_password(&password));

	match state.user_repo.get_user_by_email(&email).await {
		Ok(None) => {}
		Ok(Some(_)) => {
			return conflict::<AuthErrorResponse>("email_taken", "Email is already registered")
				.into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to look up user by email");
			return internal_error::<AuthErrorResponse>("Internal server error").into_response();
		}
	}

	let password_hash = match tokio::task::spawn_blocking(move || hash_password(&password)).await {
		Ok(Ok(hash)) => hash,
		Ok(Err(e)) => {
			tracing::error!(error = %e, "Failed to hash password");
			return internal_error::<AuthErrorResponse>("Internal server error").into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "Password hashing task failed");
			return internal_error::<AuthErrorResponse>("Internal server error").into_response();
		}
	};

	let user = User::new(email, password_hash);
	match state.user_repo.create_user(&user).await {
		Ok(()) => {}
		Err(DbError::Conflict(_)) => {
			return conflict::<AuthErrorResponse>("email_taken", "Email is already registered")
				.into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to create user");
			return internal_error::<AuthErrorResponse>("Internal server error").into_response();
		}
	}

	tracing::info!(user_id = %user.id, "user registered");
	(
		StatusCode::CREATED,
		Json(AuthSuccessResponse::new(UserSummary::from(&user.identity()))),
	)
		.into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = AuthSuccessResponse),
        (status = 400, description = "Missing email or password", body = AuthErrorResponse),
        (status = 401, description = "Email or password is incorrect", body = AuthErrorResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn login(
	State(state): State<AppState>,
	payload: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
	let payload = parse_json!(AuthErrorResponse, payload);
	let (email, password) = validate_or_error!(
		AuthErrorResponse,
		require_login_fields(&payload.email, payload.password)
	);

	let user = match state.user_repo.get_user_by_email(&email).await {
		Ok(user) => user,
		Err(e) => {
			tracing::error!(error = %e, "Failed to look up user by email");
			return internal_error::<AuthErrorResponse>("Internal server error").into_response();
		}
	};

	// Unknown emails still pay for one Argon2 verification.
	let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
	let verified = match tokio::task::spawn_blocking(move || match stored_hash {
		Some(hash) => verify_password(&password, &hash),
		None => verify_password_for_unknown_user(&password),
	})
	.await
	{
		Ok(verified) => verified,
		Err(e) => {
			tracing::error!(error = %e, "Password verification task failed");
			return internal_error::<AuthErrorResponse>("Internal server error").into_response();
		}
	};
	let user = match user {
		Some(user) if verified => user,
		Some(user) => {
			tracing::debug!(user_id = %user.id, "login with wrong password");
			return unauthorized::<AuthErrorResponse>("invalid_credentials", INVALID_LOGIN_MESSAGE)
				.into_response();
		}
		None => {
			tracing::debug!("login for unknown email");
			return unauthorized::<AuthErrorResponse>("invalid_credentials", INVALID_LOGIN_MESSAGE)
				.into_response();
		}
	};

	let token = match state.sessions.issue(&user.id, &user.email) {
		Ok(token) => token,
		Err(e) => {
			tracing::error!(error = %e, "Failed to issue session token");
			return internal_error::<AuthErrorResponse>("Internal server error").into_response();
		}
	};

	tracing::info!(user_id = %user.id, "user logged in");
	(
		StatusCode::OK,
		[(SET_COOKIE, session_cookie(&state.auth_config, &token, state.sessions.ttl()))],
		Json(AuthSuccessResponse::new(UserSummary::from(&user.identity()))),
	)
		.into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = SuccessResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
	(
		StatusCode::OK,
		[(SET_COOKIE, clear_session_cookie(&state.auth_config))],
		Json(SuccessResponse::ok()),
	)
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The authenticated user", body = UserSummary),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all, fields(user_id = %identity.user_id))]
pub async fn me(RequireAuth(identity): RequireAuth) -> impl IntoResponse {
	Json(UserSummary::from(&identity))
}
