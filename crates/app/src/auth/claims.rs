//! Token claims.

use serde::{Deserialize, Serialize};

/// Claims carried by a bearer token.
///
/// Only `sub` and `exp` are required; `iat`, `iss` and `aud` are validated
/// when the verifier is configured to do so.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user UUID in hyphenated form.
    pub sub: String,

    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,

    /// Issued-at as seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Token issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Intended audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}
