//! Reading a `Config` off disk.

use std::path::Path;

use crate::config::Config;
use crate::error::ConfigResult;
use crate::raw::RawConfig;

pub fn load(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let text = std::fs::read_to_string(path)?;
    from_str(&text)
}

pub fn from_str(text: &str) -> ConfigResult<Config> {
    let raw: RawConfig = serde_yaml::from_str(text)?;
    Config::from_raw(raw)
}
