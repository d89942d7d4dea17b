//! Configuration load/validation error type. All of these are fatal at
//! startup.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigErrorKind {
    Io,
    Parse,
    NoListenerEnabled,
    LdapsIncomplete,
    LdapIncomplete,
    LegacyAndNewBothSet,
}

#[derive(Debug, Clone)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Io, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Parse, message)
    }

    pub fn no_listener_enabled() -> Self {
        Self::new(ConfigErrorKind::NoListenerEnabled, "at least one listener must be enabled")
    }

    pub fn ldaps_incomplete() -> Self {
        Self::new(
            ConfigErrorKind::LdapsIncomplete,
            "ldaps is enabled but listen, cert, or key is missing",
        )
    }

    pub fn ldap_incomplete() -> Self {
        Self::new(ConfigErrorKind::LdapIncomplete, "ldap is enabled but listen is missing")
    }

    pub fn legacy_and_new_both_set() -> Self {
        Self::new(
            ConfigErrorKind::LegacyAndNewBothSet,
            "the legacy `frontend` block and the new `ldap`/`ldaps` blocks cannot both be set",
        )
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::parse(e.to_string())
    }
}
