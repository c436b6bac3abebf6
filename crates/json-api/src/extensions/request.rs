//! Request parsing that reports failures as `invalid_input` unless noted.

use std::str::FromStr;

use salvo::{
    Request,
    oapi::extract::{PathParam, QueryParam},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use storefront_app::uuids::TypedUuid;

use crate::errors::ApiError;

/// Deserialize a JSON request body.
pub(crate) async fn json_body<T>(req: &mut Request) -> Result<T, ApiError>
where
    T: DeserializeOwned + Send,
{
    req.parse_json::<T>().await.map_err(|error| {
        debug!(%error, "rejected request body");

        ApiError::invalid_input(format!("Invalid request body: {error}"))
    })
}

/// Parse a typed identifier from a path segment.
pub(crate) fn path_uuid<T>(param: PathParam<String>) -> Result<TypedUuid<T>, ApiError> {
    let raw = param.into_inner();

    TypedUuid::from_str(&raw)
        .map_err(|_invalid| ApiError::invalid_input(format!("Invalid identifier '{raw}'")))
}

/// Parse a typed identifier whose malformed form can never name an existing
/// resource, so it is reported as `not_found` with `message`.
pub(crate) fn path_uuid_or_not_found<T>(
    param: PathParam<String>,
    message: &str,
) -> Result<TypedUuid<T>, ApiError> {
    let raw = param.into_inner();

    TypedUuid::from_str(&raw).map_err(|_invalid| {
        debug!(id = %raw, "malformed identifier treated as missing");

        ApiError::not_found(message)
    })
}

/// Lenient numeric query parameter: anything unparsable counts as absent.
pub(crate) fn query_number(param: QueryParam<String, false>) -> Option<u32> {
    param.into_inner().and_then(|raw| raw.trim().parse().ok())
}
