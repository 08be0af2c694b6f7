//! Post store implementations.
//!
//! Available backends:
//! - `MemoryPostStore` - In-memory storage (always available)
//! - `SqlitePostStore` - Reads a CMS SQLite database (requires `sqlite` feature)

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryPostStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqlitePostStore;
