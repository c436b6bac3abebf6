//! Authentication
//!
//! Bearer credentials are HS256-signed JSON web tokens issued elsewhere; this
//! module only verifies them and turns them into an [`Identity`].

mod claims;
mod errors;
mod identity;
mod verifier;

pub use claims::*;
pub use errors::*;
pub use identity::*;
pub use verifier::*;
