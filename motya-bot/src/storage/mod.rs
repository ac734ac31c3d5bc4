//! Persistence: the configuration store on SQLite.

mod config_store;
mod error;
mod sqlite_pool;

pub use config_store::{ConfigStore, SqliteConfigStore, UserConfig};
pub use error::StorageError;
pub use sqlite_pool::SqlitePoolManager;
