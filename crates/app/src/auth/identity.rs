//! Verified caller identity.

use jiff::Timestamp;

use crate::domain::users::records::UserUuid;

/// The authenticated principal for a single request.
///
/// Produced by [`crate::auth::IdentityVerifier::verify`] and handed to services
/// explicitly; it is never stored beyond the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// The user the credential was issued to.
    pub user: UserUuid,

    /// When the credential stops being valid.
    pub expires_at: Timestamp,
}
