//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Row types for joined reads, convertible into the core composition types

pub mod composition;
pub mod product;
pub mod purchase;
pub mod supplier;
pub mod user;
