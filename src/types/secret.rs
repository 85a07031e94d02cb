// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::Result;
use http::HeaderValue;
use std::fmt;

/// Opaque secret content fetched from Key Vault
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(<redacted>)")
    }
}

/// Short-lived bearer credential, used for a single call
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// `Authorization` header value, marked sensitive so it is never logged
    pub fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_shows_content() {
        assert_eq!(format!("{:?}", SecretValue::new("s3cr3t")), "SecretValue(<redacted>)");
        assert_eq!(format!("{:?}", BearerToken::new("eyJ0")), "BearerToken(<redacted>)");
    }

    #[test]
    fn test_bearer_header_value() {
        let value = BearerToken::new("abc.def").header_value().unwrap();

        assert_eq!(value.to_str().unwrap(), "Bearer abc.def");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_bearer_header_rejects_control_characters() {
        assert!(BearerToken::new("abc\ndef").header_value().is_err());
    }
}
