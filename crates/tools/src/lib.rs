pub mod config;
pub mod host;
pub mod report;

pub use config::{AppConfig, ConfigError};
pub use host::StaticMap;
