//! The validated, legacy-mapped configuration this daemon actually runs
//! with.

use dapd_auth::hardware_token::HardwareTokenConfig;
use dapd_directory::{EntityStore, Group, User};

use crate::error::{ConfigError, ConfigResult};
use crate::raw::RawConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapListenerConfig {
    pub enabled: bool,
    pub listen: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapsListenerConfig {
    pub enabled: bool,
    pub listen: String,
    pub cert: String,
    pub key: String,
    pub enforce_tls: bool,
    pub server_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_name: String,
    pub base_dn: String,
    pub log_level: String,
    pub syslog: bool,
    pub hardware_token: Option<HardwareTokenConfig>,
    pub ldap: LdapListenerConfig,
    pub ldaps: LdapsListenerConfig,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
}

impl Config {
    /// Build the immutable entity store this configuration describes.
    pub fn entity_store(&self) -> EntityStore {
        EntityStore::new(self.users.clone(), self.groups.clone(), self.base_dn.clone())
    }

    pub fn from_raw(raw: RawConfig) -> ConfigResult<Self> {
        if raw.frontend.is_some() && (raw.ldap.is_some() || raw.ldaps.is_some()) {
            return Err(ConfigError::legacy_and_new_both_set());
        }

        // The source inconsistently defaults these two listeners: LDAP off,
        // LDAPS on. Preserved here rather than
        // "fixed", since flipping it silently would relocate the deploy
        // hazard rather than remove it.
        let (ldap, ldaps) = if let Some(legacy) = raw.frontend {
            (
                LdapListenerConfig {
                    enabled: !legacy.listen.is_empty(),
                    listen: legacy.listen,
                },
                LdapsListenerConfig {
                    enabled: !legacy.tls_listen.is_empty(),
                    listen: legacy.tls_listen,
                    cert: legacy.cert,
                    key: legacy.key,
                    enforce_tls: legacy.enforce_tls,
                    server_name: None,
                },
            )
        } else {
            let ldap = raw.ldap.unwrap_or_default();
            let ldaps = raw.ldaps.unwrap_or_default();
            (
                LdapListenerConfig { enabled: ldap.enabled, listen: ldap.listen },
                LdapsListenerConfig {
                    enabled: ldaps.enabled,
                    listen: ldaps.listen,
                    cert: ldaps.cert,
                    key: ldaps.key,
                    enforce_tls: ldaps.enforce_tls,
                    server_name: ldaps.server_name,
                },
            )
        };

        let config = Config {
            server_name: raw.server_name,
            base_dn: raw.backend.base_dn,
            log_level: raw.log_level,
            syslog: raw.syslog,
            hardware_token: raw.hardware_token,
            ldap,
            ldaps,
            users: raw.users,
            groups: raw.groups,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if !self.ldap.enabled && !self.ldaps.enabled {
            return Err(ConfigError::no_listener_enabled());
        }
        if self.ldap.enabled && self.ldap.listen.is_empty() {
            return Err(ConfigError::ldap_incomplete());
        }
        if self.ldaps.enabled
            && (self.ldaps.listen.is_empty() || self.ldaps.cert.is_empty() || self.ldaps.key.is_empty())
        {
            return Err(ConfigError::ldaps_incomplete());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::from_str;

    const BASE: &str = "backend:\n  base_dn: dc=example,dc=com\n";

    #[test]
    fn ldaps_block_omitted_entirely_fails_validation_not_silently_listens() {
        let err = from_str(BASE).unwrap_err();
        assert_eq!(err.kind, crate::error::ConfigErrorKind::LdapsIncomplete);
    }

    #[test]
    fn explicit_ldaps_block_with_all_fields_is_accepted() {
        let yaml = format!(
            "{BASE}ldaps:\n  listen: 0.0.0.0:636\n  cert: server.pem\n  key: server.key\n"
        );
        let config = from_str(&yaml).unwrap();
        assert!(config.ldaps.enabled);
        assert!(!config.ldap.enabled);
    }

    #[test]
    fn ldap_enabled_without_listen_is_rejected() {
        let yaml = format!("{BASE}ldap:\n  enabled: true\nldaps:\n  enabled: false\n");
        let err = from_str(&yaml).unwrap_err();
        assert_eq!(err.kind, crate::error::ConfigErrorKind::LdapIncomplete);
    }

    #[test]
    fn no_listener_enabled_is_rejected() {
        let yaml = format!("{BASE}ldap:\n  enabled: false\nldaps:\n  enabled: false\n");
        let err = from_str(&yaml).unwrap_err();
        assert_eq!(err.kind, crate::error::ConfigErrorKind::NoListenerEnabled);
    }

    #[test]
    fn legacy_frontend_block_maps_into_ldap_and_ldaps() {
        let yaml = format!(
            "{BASE}frontend:\n  listen: 0.0.0.0:389\n  tls_listen: 0.0.0.0:636\n  cert: c.pem\n  key: k.pem\n  enforce_tls: true\n"
        );
        let config = from_str(&yaml).unwrap();
        assert!(config.ldap.enabled);
        assert_eq!(config.ldap.listen, "0.0.0.0:389");
        assert!(config.ldaps.enabled);
        assert_eq!(config.ldaps.listen, "0.0.0.0:636");
        assert!(config.ldaps.enforce_tls);
    }

    #[test]
    fn legacy_and_new_forms_together_are_rejected() {
        let yaml = format!("{BASE}frontend:\n  listen: 0.0.0.0:389\nldap:\n  enabled: true\n  listen: 0.0.0.0:389\n");
        let err = from_str(&yaml).unwrap_err();
        assert_eq!(err.kind, crate::error::ConfigErrorKind::LegacyAndNewBothSet);
    }
}
