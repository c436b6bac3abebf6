//! Bearer credential verification.

use std::{fmt, time::Duration};

use jiff::Timestamp;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use mockall::automock;
use uuid::Uuid;

use crate::{
    auth::{Claims, Identity, VerifyError},
    domain::users::records::UserUuid,
};

/// Settings for [`JwtVerifier`].
#[derive(Clone)]
pub struct JwtSettings {
    /// Shared HMAC secret used to sign tokens.
    pub secret: String,

    /// Expected `iss` claim, if any.
    pub issuer: Option<String>,

    /// Expected `aud` claim, if any.
    pub audience: Option<String>,

    /// Clock skew tolerated when checking `exp`.
    pub leeway: Duration,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"**redacted**")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway", &self.leeway)
            .finish()
    }
}

/// HS256 JSON web token verifier.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    #[must_use]
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);

        validation.leeway = settings.leeway.as_secs();
        validation.set_required_spec_claims(&["exp", "sub"]);

        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }

        match &settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
        }
    }
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("key", &"**redacted**")
            .field("validation", &self.validation)
            .finish()
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, credential: &str) -> Result<Identity, VerifyError> {
        let credential = credential.trim();

        if credential.is_empty() {
            return Err(VerifyError::Missing);
        }

        let claims = decode::<Claims>(credential, &self.key, &self.validation)?.claims;

        let user = Uuid::try_parse(&claims.sub)
            .map(UserUuid::from_uuid)
            .map_err(|_parse_error| VerifyError::InvalidClaims("subject is not a user id"))?;

        let expires_at = Timestamp::from_second(claims.exp)
            .map_err(|_range_error| VerifyError::InvalidClaims("expiry is out of range"))?;

        Ok(Identity { user, expires_at })
    }
}

/// Turns a bearer credential into a caller [`Identity`].
#[automock]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `credential` (the part after `Bearer `).
    ///
    /// # Errors
    ///
    /// Returns a [`VerifyError`] for any missing, malformed, expired or
    /// wrongly-signed credential.
    fn verify(&self, credential: &str) -> Result<Identity, VerifyError>;
}
