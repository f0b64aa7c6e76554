use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteStashError {
    #[error("No saved data found")]
    StoreMissing,

    #[error("Error reading request body: {0}")]
    BodyRead(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NoteStashError>;
