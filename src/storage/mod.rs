pub mod memory;
pub mod repo;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use repo::*;
pub use sqlite::SqliteStorage;
