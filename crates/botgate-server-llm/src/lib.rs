// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Upstream LLM provider adapters.
//!
//! Each adapter turns a [`ChatRequest`] plus a caller-supplied API key into
//! one HTTP call against its provider and extracts the reply text. Adapters
//! never retry, never log the key, and never put an upstream body or request
//! URL into an error value.
//!
//! The [`ProviderRegistry`] is the closed dispatch table the server builds at
//! startup.

mod adapter;
pub mod anthropic;
mod error;
pub mod google;
pub mod openai;
mod registry;
mod types;

pub use adapter::ProviderAdapter;
pub use anthropic::{AnthropicAdapter, AnthropicConfig};
pub use error::ProviderError;
pub use google::{GoogleAdapter, GoogleConfig};
pub use openai::{OpenAiAdapter, OpenAiConfig};
pub use registry::ProviderRegistry;
pub use types::{ChatRequest, ChatResult, FALLBACK_TEXT};
