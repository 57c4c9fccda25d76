use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no usable markup from {url}")]
    Transport { url: String },

    #[error("no {target} locator matched the fetched markup")]
    Extraction { target: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML parsing failed: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ReaderError>;
