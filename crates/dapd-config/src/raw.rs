//! The as-written YAML shape, before legacy-form mapping and validation.

use dapd_auth::hardware_token::HardwareTokenConfig;
use dapd_directory::{Group, User};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default = "default_server_name")]
    pub server_name: String,
    pub backend: RawBackend,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub syslog: bool,
    #[serde(default)]
    pub hardware_token: Option<HardwareTokenConfig>,
    #[serde(default)]
    pub ldap: Option<RawLdapListener>,
    #[serde(default)]
    pub ldaps: Option<RawLdapsListener>,
    /// Legacy single-block listener form, kept for backward compatibility
    /// and mapped into the new `ldap`/`ldaps` form at load time.
    #[serde(default)]
    pub frontend: Option<RawLegacyFrontend>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBackend {
    pub base_dn: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawLdapListener {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub listen: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLdapsListener {
    /// Defaults to `true`, asymmetric with plain LDAP's default of `false`.
    /// An omitted `ldaps:` block still defaults `enabled` to `true` here,
    /// which is exactly what makes an unconfigured block a validation
    /// failure rather than silent listening.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub listen: String,
    #[serde(default)]
    pub cert: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub enforce_tls: bool,
    #[serde(default)]
    pub server_name: Option<String>,
}

impl Default for RawLdapsListener {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: String::new(),
            cert: String::new(),
            key: String::new(),
            enforce_tls: false,
            server_name: None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLegacyFrontend {
    #[serde(default)]
    pub listen: String,
    #[serde(default)]
    pub tls_listen: String,
    #[serde(default)]
    pub cert: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub enforce_tls: bool,
}

fn default_server_name() -> String {
    "dapd".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
