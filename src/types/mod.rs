// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Event and credential types passed between the relay's stages.

pub mod event;
pub mod secret;

pub use event::ChangeNotification;
pub use secret::{BearerToken, SecretValue};
