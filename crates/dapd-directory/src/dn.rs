//! Distinguished-name construction.

/// Build `cn=<user-cn>,ou=users,<base_dn>`.
pub fn user_dn(cn: &str, base_dn: &str) -> String {
    format!("cn={cn},ou=users,{base_dn}")
}

/// Build `cn=<group-cn>,ou=groups,<base_dn>`.
pub fn group_dn(cn: &str, base_dn: &str) -> String {
    format!("cn={cn},ou=groups,{base_dn}")
}

/// Case-insensitive "does `dn` end with `suffix`" check, used throughout
/// for base-DN scoping.
pub fn dn_ends_with(dn: &str, suffix: &str) -> bool {
    dn.to_lowercase().ends_with(&suffix.to_lowercase())
}
