//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod item_repo;
pub mod purchase_repo;
pub mod registry_repo;

pub use item_repo::ItemRepo;
pub use purchase_repo::PurchaseRepo;
pub use registry_repo::RegistryRepo;
