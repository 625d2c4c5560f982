// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared outbound HTTP client for botgate.
//!
//! Every upstream call made by the gateway goes through a client built here so
//! that the User-Agent and the request deadline are applied uniformly. There is
//! deliberately no retry helper: a failed upstream call is surfaced once.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent};
