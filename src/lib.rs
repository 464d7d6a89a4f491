pub mod checker;
pub mod config;
pub mod markup;
pub mod notifier;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use markup::SizeAvailability;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
