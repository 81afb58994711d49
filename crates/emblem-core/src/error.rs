use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmblemError {
    #[error("texture fetch failed: {0}")]
    TextureFetch(String),

    #[error("texture decode failed: {0}")]
    TextureDecode(String),

    #[error("invalid mesh data: {0}")]
    InvalidMesh(String),

    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EmblemError>;
