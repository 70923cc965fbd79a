//! Domain logic for the inventory service.
//!
//! This crate has no database dependency. Storage is reached through the
//! traits in [`composition::store`], implemented by the `inventory-db` crate
//! for PostgreSQL and by [`composition::memory`] for in-process use.

pub mod composition;
pub mod error;
pub mod types;
