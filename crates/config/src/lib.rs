// Configuration loading

pub mod error;
pub mod profiles;

pub use error::ConfigError;
pub use profiles::{CellProfiles, ConfigFormat};
