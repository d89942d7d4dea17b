//! The immutable entity store.

use crate::dn::user_dn;
use crate::entity::{Group, User};

/// Holds the user/group set loaded at startup. Immutable after
/// construction — every accessor takes `&self` and is safe to call from
/// multiple concurrent connections.
#[derive(Debug, Clone)]
pub struct EntityStore {
    users: Vec<User>,
    groups: Vec<Group>,
    base_dn: String,
}

impl EntityStore {
    pub fn new(users: Vec<User>, groups: Vec<Group>, base_dn: String) -> Self {
        Self { users, groups, base_dn }
    }

    pub fn base_dn(&self) -> &str {
        &self.base_dn
    }

    /// Linear scan by case-insensitive common-name match. First wins when
    /// the configuration contains duplicates.
    pub fn find_user(&self, cn: &str) -> Option<&User> {
        self.users.iter().find(|u| u.cn.eq_ignore_ascii_case(cn))
    }

    pub fn find_group(&self, cn: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.cn.eq_ignore_ascii_case(cn))
    }

    /// Users, in configuration order.
    pub fn iterate_users(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    /// Groups, in configuration order.
    pub fn iterate_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Distinguished names of every user whose membership list contains
    /// `group_cn`. The group itself must actually exist in the store for
    /// membership to count.
    pub fn members_of(&self, group_cn: &str) -> Vec<String> {
        if self.find_group(group_cn).is_none() {
            return Vec::new();
        }
        self.users
            .iter()
            .filter(|u| u.member_of.iter().any(|g| g.eq_ignore_ascii_case(group_cn)))
            .map(|u| user_dn(&u.cn, &self.base_dn))
            .collect()
    }

    /// Existing group common names (original case) a user actually
    /// belongs to — i.e. `memberOf` after dropping dangling group names.
    pub fn existing_groups_of(&self, user: &User) -> Vec<String> {
        user.member_of
            .iter()
            .filter_map(|claimed| self.find_group(claimed).map(|g| g.cn.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(cn: &str, groups: &[&str]) -> User {
        User {
            cn: cn.to_string(),
            display_name: None,
            given_name: None,
            surname: None,
            mail: None,
            password: String::new(),
            app_password_hashes: vec![],
            otp_secret: None,
            hardware_token_id: None,
            uid_number: 0,
            gid_number: 0,
            home_directory: None,
            login_shell: None,
            ssh_public_keys: vec![],
            disabled: false,
            member_of: groups.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn group(cn: &str) -> Group {
        Group { cn: cn.to_string(), description: None }
    }

    #[test]
    fn first_match_wins_on_duplicate_common_names() {
        let store = EntityStore::new(
            vec![
                User { mail: Some("first@example.com".into()), ..user("dup", &[]) },
                User { mail: Some("second@example.com".into()), ..user("dup", &[]) },
            ],
            vec![],
            "dc=example,dc=com".into(),
        );
        assert_eq!(store.find_user("dup").unwrap().mail.as_deref(), Some("first@example.com"));
    }

    #[test]
    fn find_user_is_case_insensitive() {
        let store = EntityStore::new(vec![user("Alice", &[])], vec![], "dc=example,dc=com".into());
        assert!(store.find_user("alice").is_some());
        assert!(store.find_user("ALICE").is_some());
    }

    #[test]
    fn members_of_requires_group_to_exist() {
        let store = EntityStore::new(
            vec![user("alice", &["admins", "ghosts"])],
            vec![group("admins")],
            "dc=example,dc=com".into(),
        );
        assert_eq!(
            store.members_of("admins"),
            vec!["cn=alice,ou=users,dc=example,dc=com".to_string()]
        );
        assert!(store.members_of("ghosts").is_empty());
    }

    #[test]
    fn existing_groups_of_drops_dangling_names() {
        let store = EntityStore::new(
            vec![user("alice", &["admins", "ghosts"])],
            vec![group("admins")],
            "dc=example,dc=com".into(),
        );
        let u = store.find_user("alice").unwrap();
        assert_eq!(store.existing_groups_of(u), vec!["admins".to_string()]);
    }
}
