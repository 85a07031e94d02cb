// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret synchronization from Key Vault to DSM.

pub mod handler;
pub mod payload;

pub use handler::{SecretSyncHandler, SkipReason, SyncOutcome};
pub use payload::{encode_secret_data, TargetSecretPayload};
