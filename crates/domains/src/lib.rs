//! whiteboard/crates/domains/src/lib.rs
//!
//! Domain models, port traits and error types shared by every other crate.

pub mod document;
pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use document::*;
pub use errors::*;
pub use models::*;
pub use ports::*;
