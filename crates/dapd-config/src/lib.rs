//! # dapd-config
//!
//! YAML configuration loading, legacy-form mapping, and validation.

pub mod config;
pub mod error;
pub mod loader;
pub mod raw;

pub use config::{Config, LdapListenerConfig, LdapsListenerConfig};
pub use error::{ConfigError, ConfigErrorKind, ConfigResult};
pub use loader::load;
