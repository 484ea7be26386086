//! vidshare/crates/vs-core/src/lib.rs
//!
//! The central domain logic and interface definitions for vidshare.

pub mod envelope;
pub mod error;
pub mod guard;
pub mod ids;
pub mod models;
pub mod query;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
