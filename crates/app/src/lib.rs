//! Storefront application core: identity verification, persistence and the
//! cart, inventory, product and user domains.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod uuids;

#[cfg(test)]
mod test;
