//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or `&mut PgConnection` when the call must run
//! inside a caller-owned transaction) as the first argument.

pub mod composition_repo;
pub mod product_repo;
pub mod purchase_repo;
pub mod supplier_repo;
pub mod user_repo;

pub use composition_repo::CompositionRepo;
pub use product_repo::ProductRepo;
pub use purchase_repo::PurchaseRepo;
pub use supplier_repo::SupplierRepo;
pub use user_repo::UserRepo;
