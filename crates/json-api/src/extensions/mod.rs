//! Extension traits

mod depot;
mod request;
mod result;

pub(crate) use depot::DepotExt as _;
pub(crate) use request::{json_body, path_uuid, path_uuid_or_not_found, query_number};
pub(crate) use result::ResultExt as _;
