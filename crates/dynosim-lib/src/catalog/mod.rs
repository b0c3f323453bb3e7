//! Modification reference data: categories, catalog entries, and loading.
//!
//! This module is organized into focused submodules:
//!
//! - [`category`] - Modification categories and their projection semantics
//! - [`modification`] - Catalog entry type and validation
//! - [`loader`] - CSV loading, the builtin table, and keyed lookup
//!
//! # Example
//!
//! ```
//! use dynosim_lib::catalog::ModCatalog;
//!
//! let catalog = ModCatalog::builtin();
//! let entry = catalog.lookup("stage3-tune").unwrap();
//! assert!(entry.tier_rank.is_some());
//! ```

pub mod category;
pub mod loader;
pub mod modification;

pub use category::ModCategory;
pub use loader::ModCatalog;
pub use modification::Modification;
