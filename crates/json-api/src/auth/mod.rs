//! Authentication

pub(crate) mod gateway;
