//! Entry synthesis — attribute lists for users and groups.

use crate::dn::{group_dn, user_dn};
use crate::entity::{Group, User};
use crate::store::EntityStore;

/// A synthesised directory entry: a distinguished name plus an ordered
/// list of `(attribute, values)` pairs. `objectClass` is just another
/// attribute in this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub dn: String,
    pub attrs: Vec<(String, Vec<String>)>,
}

impl Entry {
    fn push(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.push((name.to_string(), vec![value.into()]));
    }

    fn push_many(&mut self, name: &str, values: Vec<String>) {
        if !values.is_empty() {
            self.attrs.push((name.to_string(), values));
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }
}

/// Synthesise the entry for a user.
pub fn synthesize_user(user: &User, store: &EntityStore) -> Entry {
    let dn = user_dn(&user.cn, store.base_dn());
    let mut object_classes = vec![
        "inetOrgPerson".to_string(),
        "person".to_string(),
        "uidObject".to_string(),
    ];
    if user.is_posix() {
        object_classes.push("posixAccount".to_string());
    }

    let mut entry = Entry { dn, attrs: Vec::new() };
    entry.push_many("objectClass", object_classes);
    entry.push("cn", user.cn.clone());
    entry.push("uid", user.cn.clone());

    if let Some(mail) = &user.mail {
        if !mail.is_empty() {
            entry.push("mail", mail.clone());
        }
    }

    let has_name_parts = matches!(
        (&user.given_name, &user.surname),
        (Some(g), Some(s)) if !g.is_empty() && !s.is_empty()
    );
    if has_name_parts {
        let given = user.given_name.as_deref().unwrap();
        let sur = user.surname.as_deref().unwrap();
        entry.push("givenName", given.to_string());
        entry.push("sn", sur.to_string());
        entry.push("fullName", format!("{given} {sur}"));
    }

    entry.push("displayName", user.derived_display_name());

    if user.is_posix() {
        entry.push("uidNumber", user.uid_number.to_string());
        entry.push("gidNumber", user.gid_number.to_string());
        entry.push("loginShell", user.login_shell_or_default().to_string());
        entry.push("homeDirectory", user.home_directory_or_default());
        entry.push("loginDisabled", if user.disabled { "TRUE" } else { "FALSE" });
        entry.push_many("sshPublicKey", user.ssh_public_keys.clone());
    }

    entry.push("accountStatus", if user.disabled { "inactive" } else { "active" });

    let member_of: Vec<String> = store
        .existing_groups_of(user)
        .into_iter()
        .map(|group_cn| group_dn(&group_cn, store.base_dn()))
        .collect();
    entry.push_many("memberOf", member_of);

    entry
}

/// Synthesise the entry for a group.
pub fn synthesize_group(group: &Group, store: &EntityStore) -> Entry {
    let dn = group_dn(&group.cn, store.base_dn());
    let mut entry = Entry { dn, attrs: Vec::new() };
    entry.push_many("objectClass", vec!["groupOfNames".to_string()]);
    entry.push("cn", group.cn.clone());
    if let Some(description) = &group.description {
        entry.push("description", description.clone());
    }
    entry.push_many("member", store.members_of(&group.cn));
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Group, User};

    fn posix_user() -> User {
        User {
            cn: "dave".into(),
            display_name: None,
            given_name: Some("Dave".into()),
            surname: Some("Jones".into()),
            mail: Some("dave@example.com".into()),
            password: "{SSHA256}xx".into(),
            app_password_hashes: vec![],
            otp_secret: None,
            hardware_token_id: Some("ccccccbcgujh".into()),
            uid_number: 1001,
            gid_number: 1001,
            home_directory: None,
            login_shell: None,
            ssh_public_keys: vec!["ssh-ed25519 AAAA...".into()],
            disabled: false,
            member_of: vec!["admins".into()],
        }
    }

    fn non_posix_user() -> User {
        User { uid_number: 0, gid_number: 0, ..posix_user() }
    }

    #[test]
    fn posix_user_gets_posix_attributes_and_object_class() {
        let store = EntityStore::new(
            vec![posix_user()],
            vec![Group { cn: "admins".into(), description: None }],
            "dc=example,dc=com".into(),
        );
        let entry = synthesize_user(store.find_user("dave").unwrap(), &store);
        assert_eq!(entry.dn, "cn=dave,ou=users,dc=example,dc=com");
        assert_eq!(
            entry.get("objectClass").unwrap(),
            &["inetOrgPerson", "person", "uidObject", "posixAccount"]
        );
        assert_eq!(entry.get("uidNumber").unwrap(), &["1001"]);
        assert_eq!(entry.get("homeDirectory").unwrap(), &["/home/dave"]);
        assert_eq!(entry.get("loginShell").unwrap(), &["/bin/bash"]);
        assert_eq!(
            entry.get("memberOf").unwrap(),
            &["cn=admins,ou=groups,dc=example,dc=com"]
        );
    }

    #[test]
    fn non_posix_user_has_no_posix_attributes() {
        let store = EntityStore::new(vec![non_posix_user()], vec![], "dc=example,dc=com".into());
        let entry = synthesize_user(store.find_user("dave").unwrap(), &store);
        assert_eq!(entry.get("objectClass").unwrap(), &["inetOrgPerson", "person", "uidObject"]);
        assert!(entry.get("uidNumber").is_none());
        assert!(entry.get("sshPublicKey").is_none());
    }

    #[test]
    fn unknown_group_is_silently_omitted_from_member_of() {
        let store = EntityStore::new(vec![posix_user()], vec![], "dc=example,dc=com".into());
        let entry = synthesize_user(store.find_user("dave").unwrap(), &store);
        assert!(entry.get("memberOf").is_none());
    }

    #[test]
    fn group_entry_carries_members() {
        let store = EntityStore::new(
            vec![posix_user()],
            vec![Group { cn: "admins".into(), description: Some("Admins".into()) }],
            "dc=example,dc=com".into(),
        );
        let entry = synthesize_group(store.find_group("admins").unwrap(), &store);
        assert_eq!(entry.dn, "cn=admins,ou=groups,dc=example,dc=com");
        assert_eq!(entry.get("objectClass").unwrap(), &["groupOfNames"]);
        assert_eq!(entry.get("member").unwrap(), &["cn=dave,ou=users,dc=example,dc=com"]);
    }

    #[test]
    fn disabled_user_has_inactive_status_and_true_login_disabled() {
        let user = User { disabled: true, ..posix_user() };
        let store = EntityStore::new(vec![user], vec![], "dc=example,dc=com".into());
        let entry = synthesize_user(store.find_user("dave").unwrap(), &store);
        assert_eq!(entry.get("accountStatus").unwrap(), &["inactive"]);
        assert_eq!(entry.get("loginDisabled").unwrap(), &["TRUE"]);
    }
}
