pub mod api;
pub mod config;
pub mod loads;
pub mod middlewares;

pub use config::{AppConfig, ConfigError};
pub use loads::*;
