// storage/mod.rs
// Document store access: connection management, backends and data-access helpers

pub mod access;
pub mod backend;
pub mod connection;
pub mod memory;
pub mod mongo;
pub mod query;

// Re-export commonly used items
pub use access::{insert_many, insert_one, retrieve_all, update_many, update_one};
pub use backend::{DatabaseHandle, StoreClient};
pub use connection::{ConnectionManager, Credentials, DatabaseStatus};
pub use memory::MemoryClient;
pub use query::{FieldFilter, FieldUpdate, UpdateSummary};
