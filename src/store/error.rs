use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Blog database not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Blog database already exists: {0:?}")]
    AlreadyExists(PathBuf),

    #[error("Could not get {0} from the config table, aborting")]
    MissingConfig(&'static str),

    #[error("Post {id} has an unreadable date: {value:?}")]
    InvalidDate { id: i64, value: String },

    #[error("Post has not been saved yet")]
    Unsaved,

    #[error("Failed to write image {path:?}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
