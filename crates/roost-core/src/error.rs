use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access stored data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse stored data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid credential record: {0}")]
    InvalidRecord(String),

    #[error("Invalid portal profile: {0}")]
    InvalidPortal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
