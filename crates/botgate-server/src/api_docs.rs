// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for botgate-server.
//!
//! The document is generated from the handler annotations and wire
//! types with utoipa. The raw JSON is served at `/api/openapi.json` and the
//! interactive documentation at `/api/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "botgate API",
        version = "0.1.0",
        description = "Authenticated credential gateway. Users store encrypted LLM provider API keys, configure bots that use them, and chat through the server without the key ever reaching the browser.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Health checks"),
        (name = "auth", description = "Registration, login, and the current session"),
        (name = "api-keys", description = "Provider API key storage"),
        (name = "bots", description = "Bot configuration"),
        (name = "chat", description = "Chat with a bot through its provider")
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::api_keys::list_api_keys,
        crate::routes::api_keys::create_api_key,
        crate::routes::api_keys::update_api_key,
        crate::routes::api_keys::delete_api_key,
        crate::routes::bots::list_bots,
        crate::routes::bots::create_bot,
        crate::routes::bots::get_bot,
        crate::routes::bots::update_bot,
        crate::routes::bots::delete_bot,
        crate::routes::chat::chat,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            botgate_server_api::SuccessResponse,
            botgate_server_api::HealthResponse,
            botgate_server_api::HealthStatus,
            botgate_server_api::RegisterRequest,
            botgate_server_api::LoginRequest,
            botgate_server_api::UserSummary,
            botgate_server_api::AuthSuccessResponse,
            botgate_server_api::AuthErrorResponse,
            botgate_server_api::CreateApiKeyRequest,
            botgate_server_api::UpdateApiKeyRequest,
            botgate_server_api::ApiKeyResponse,
            botgate_server_api::ApiKeyErrorResponse,
            botgate_server_api::CreateBotRequest,
            botgate_server_api::UpdateBotRequest,
            botgate_server_api::BotResponse,
            botgate_server_api::BotErrorResponse,
            botgate_server_api::ChatRequest,
            botgate_server_api::ChatResponse,
            botgate_server_api::ChatErrorResponse,
        )
    )
)]
pub struct ApiDoc;
