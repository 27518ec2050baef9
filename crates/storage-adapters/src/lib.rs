//! # storage-adapters
//!
//! `DocumentStore` implementations: an in-memory store and, behind the
//! `store-file` feature, a store that persists to a JSON snapshot file.

#[cfg(feature = "store-file")]
pub mod file;
pub mod memory;

#[cfg(feature = "store-file")]
pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;
