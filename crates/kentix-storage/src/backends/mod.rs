//! Store backends.

pub mod memory;
pub mod redb;

pub use memory::MemoryConfigStore;
pub use self::redb::RedbConfigStore;
