mod backend;
mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use store::{DEFAULT_TABLES, MockStore};
