//! foodify/crates/foodify-core/src/lib.rs
//!
//! The domain types and interface definitions for Foodify.

pub mod catalog;
pub mod error;
pub mod id;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use catalog::*;
pub use error::*;
pub use id::*;
pub use models::*;
pub use traits::*;
