//! Types shared by every quadgl crate: error enums and colors.

pub mod errors;
pub mod types;

pub use errors::{ConfigError, QuadglError};
pub use types::Color;

pub type Result<T> = std::result::Result<T, QuadglError>;
