//! Shared foundations for skillman: filesystem layout, configuration, errors and logging.

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use config::{Config, ConfigSource, ConfigStore, DEFAULT_CONFIG_URL, HttpSource, LoggingConfig};
pub use error::{Error, Result};
pub use paths::{HOME_PREFIX, Paths};
