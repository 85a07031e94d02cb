// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod azure;
pub mod config;
pub mod constants;
pub mod dsm;
pub mod error;
pub mod server;
pub mod sync;
pub mod transport;
pub mod types;

#[cfg(test)]
pub mod test_utils;
