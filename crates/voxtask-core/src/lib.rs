pub mod config;
pub mod error;
pub mod types;

pub use config::VoxtaskConfig;
pub use error::{Result, VoxtaskError};
pub use types::*;
