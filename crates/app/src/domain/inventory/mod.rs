//! Inventory

pub mod errors;
pub(crate) mod repository;
pub mod service;

pub use errors::InventoryError;
pub use service::*;
