//! Storage Adapters
//!
//! Implementations of the DocumentStore port.
//!
//! ## Available Adapters
//!
//! - **InMemoryDocumentStore** - Documents in memory with compare-and-set stamps
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryDocumentStore;
//!
//! let store = Arc::new(InMemoryDocumentStore::new());
//! ```

mod in_memory_document_store;

pub use in_memory_document_store::InMemoryDocumentStore;
