//! User and Group entity definitions.

use serde::{Deserialize, Serialize};

/// A directory user, as configured at startup.
///
/// The common name (`cn`) is the entity's unique identifier within its
/// kind; lookups compare it case-insensitively, but every attribute and
/// distinguished name synthesised from a `User` preserves the case it was
/// configured with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub cn: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,

    /// Stored `{scheme}base64(...)` password string. May be unparsable —
    /// that only matters if a bind ever falls through to it.
    #[serde(default)]
    pub password: String,
    /// SHA-256 hex digests of application passwords; any match
    /// short-circuits OTP and the primary password check.
    #[serde(default)]
    pub app_password_hashes: Vec<String>,
    /// Base32 TOTP shared secret.
    #[serde(default)]
    pub otp_secret: Option<String>,
    /// 12-character hardware-token public identifier.
    #[serde(default)]
    pub hardware_token_id: Option<String>,

    #[serde(default)]
    pub uid_number: i64,
    #[serde(default)]
    pub gid_number: i64,
    #[serde(default)]
    pub home_directory: Option<String>,
    #[serde(default)]
    pub login_shell: Option<String>,
    #[serde(default)]
    pub ssh_public_keys: Vec<String>,

    #[serde(default)]
    pub disabled: bool,

    /// Group common names this user claims membership in. A name with no
    /// matching group in the store is silently ignored everywhere a
    /// `memberOf` value is derived.
    #[serde(default)]
    pub member_of: Vec<String>,
}

impl User {
    /// True iff both numeric ids are strictly positive.
    pub fn is_posix(&self) -> bool {
        self.uid_number > 0 && self.gid_number > 0
    }

    /// Derived display name: explicit value,
    /// else `givenName+" "+surname` when both are present, else the `cn`.
    pub fn derived_display_name(&self) -> String {
        if let Some(explicit) = &self.display_name {
            if !explicit.is_empty() {
                return explicit.clone();
            }
        }
        if let (Some(given), Some(sur)) = (&self.given_name, &self.surname) {
            if !given.is_empty() && !sur.is_empty() {
                return format!("{given} {sur}");
            }
        }
        self.cn.clone()
    }

    pub fn login_shell_or_default(&self) -> &str {
        self.login_shell.as_deref().unwrap_or("/bin/bash")
    }

    pub fn home_directory_or_default(&self) -> String {
        self.home_directory
            .clone()
            .unwrap_or_else(|| format!("/home/{}", self.cn))
    }
}

/// A directory group. Membership is not stored here — it is derived by
/// scanning users at query time. Membership is authored on users but
/// surfaced on groups via `memberOf`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Group {
    pub cn: String,
    #[serde(default)]
    pub description: Option<String>,
}
