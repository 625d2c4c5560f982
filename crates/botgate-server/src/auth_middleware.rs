// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! [`auth_layer`] runs on every request. It reads the session token (cookie
//! first, then `Authorization: Bearer`), verifies it, and stores the resulting
//! [`Identity`] as a request extension. Handlers that need a user take the
//! [`RequireAuth`] extractor, which rejects with 401 when no identity is
//! present.
//!
//! # Security Properties
//!
//! - Tokens are never logged; only the verified user id is recorded
//! - Every verification failure looks the same: no identity, then 401
//! - Dev mode never bypasses authentication
//!
//! # Usage
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/auth/me", get(me))
//!     .layer(from_fn_with_state(state.clone(), auth_layer));
//!
//! async fn me(RequireAuth(identity): RequireAuth) -> impl IntoResponse { ... }
//! ```

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request, StatusCode},
	middleware::Next,
	response::{IntoResponse, Response},
	Json,
};
use botgate_server_auth::{session_token_candidates, Identity};
use tracing::instrument;

use crate::{api::AppState, error::ErrorResponse};

/// Authentication middleware that attaches the verified [`Identity`], if any.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(user_id = tracing::field::Empty)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let candidates = session_token_candidates(request.headers(), &state.auth_config);
	match candidates.iter().find_map(|token| state.sessions.verify(token)) {
		Some(identity) => {
			tracing::Span::current().record("user_id", tracing::field::display(&identity.user_id));
			request.extensions_mut().insert(identity);
		}
		None if !candidates.is_empty() => tracing::debug!("session token rejected"),
		None => {}
	}

	next.run(request).await
}

/// Extractor for routes that require an authenticated user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		match parts.extensions.get::<Identity>().cloned() {
			Some(identity) => {
				tracing::debug!(user_id = %identity.user_id, "Authentication required: success");
				Ok(RequireAuth(identity))
			}
			None => {
				tracing::debug!("Authentication required: no valid session");
				Err(
					(
						StatusCode::UNAUTHORIZED,
						Json(ErrorResponse::new("unauthorized", "Authentication required")),
					)
						.into_response(),
				)
			}
		}
	}
}
