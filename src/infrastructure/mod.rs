//! Infrastructure layer - external adapters (database, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod data_url;
pub mod kv_store;
pub mod local_storage;

pub use config::{config_file_path, ensure_config_exists, load_config};
pub use data_url::read_as_data_url;
pub use kv_store::{KeyValueStore, MemoryStorage};
pub use local_storage::{LocalStorage, StoredKey};
