use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaranexError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl VaranexError {
    pub fn storage(key: impl AsRef<str>, message: impl std::fmt::Display) -> Self {
        Self::Storage(format!("{}: {}", key.as_ref(), message))
    }
}

pub type Result<T> = std::result::Result<T, VaranexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_names_the_key() {
        let e = VaranexError::storage("chats", "disk full");
        assert_eq!(e.to_string(), "Storage error: chats: disk full");
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: VaranexError = io_err.into();
        assert!(e.to_string().contains("IO error"));
    }
}
