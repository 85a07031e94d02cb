// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Azure clients: managed identity tokens and Key Vault secret reads.

pub mod identity;
pub mod keyvault;

pub use identity::acquire_token;
pub use keyvault::get_secret;
