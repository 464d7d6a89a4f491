use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Delivery rejected: status {status}: {message}")]
    Delivery { status: u16, message: String },
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
