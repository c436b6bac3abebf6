//! Credential verification errors.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use thiserror::Error;

/// Why a bearer credential was refused.
///
/// Every variant means the same thing to callers: the request is
/// unauthorized. The variants only exist so the rejection can say why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("missing bearer credential")]
    Missing,

    #[error("malformed bearer credential")]
    Malformed,

    #[error("credential has expired")]
    Expired,

    #[error("credential signature is invalid")]
    InvalidSignature,

    #[error("credential claims are invalid: {0}")]
    InvalidClaims(&'static str),
}

impl From<JwtError> for VerifyError {
    fn from(error: JwtError) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidIssuer => Self::InvalidClaims("unexpected issuer"),
            ErrorKind::InvalidAudience => Self::InvalidClaims("unexpected audience"),
            ErrorKind::ImmatureSignature => Self::InvalidClaims("credential is not yet valid"),
            ErrorKind::MissingRequiredClaim(_) => Self::InvalidClaims("required claim missing"),
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::InvalidClaims("unsupported signing algorithm")
            }
            _ => Self::Malformed,
        }
    }
}
