use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build injected script: {0}")]
    Script(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
