pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod server;
pub mod storage;

pub use config::ServerConfig;
pub use entity::{Content, Note, Snapshot};
pub use error::{NoteStashError, Result};
pub use storage::SnapshotStore;
