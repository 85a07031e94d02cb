// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! DSM client: client-credentials token and secret upsert.

pub mod auth;
pub mod secrets;

pub use auth::request_token;
pub use secrets::upsert_secret;
