//! End-to-end bind/search scenarios, exercised through the public
//! crate surface rather than raw sockets — config load, entity store,
//! bind, and search wired together the way `main` wires them.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

use dapd_lib::directory::{EntityStore, Group, User};
use dapd_lib::proto::ResultCode;
use dapd_lib::server::bind::bind;
use dapd_lib::server::search::search;
use dapd_lib::server::stats::Stats;

fn ssha256(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    let mut payload = hasher.finalize().to_vec();
    payload.extend_from_slice(salt.as_bytes());
    format!("{{SSHA256}}{}", STANDARD.encode(payload))
}

fn bare_user(cn: &str) -> User {
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
        member_of: vec![],
    }
}

/// Scenario 1: alice binds with her SSHA256 password; a different case
/// fails.
#[tokio::test]
async fn scenario_alice_ssha256_bind() {
    let user = User { password: ssha256("hunter2", "NaCl"), ..bare_user("alice") };
    let store = EntityStore::new(vec![user], vec![], "dc=example,dc=com".into());
    let stats = Stats::new();

    let ok = bind("cn=alice,ou=users,dc=example,dc=com", "hunter2", &store, None, &stats).await;
    assert_eq!(ok, ResultCode::Success);

    let wrong_case =
        bind("cn=alice,ou=users,dc=example,dc=com", "Hunter2", &store, None, &stats).await;
    assert_eq!(wrong_case, ResultCode::InvalidCredentials);
}

/// Scenario 2: bob's app password bypasses an unparseable stored password.
#[tokio::test]
async fn scenario_bob_app_password_bypass() {
    let digest = hex::encode(Sha256::digest(b"letmein"));
    let user = User {
        password: "garbage".into(),
        app_password_hashes: vec![digest],
        ..bare_user("bob")
    };
    let store = EntityStore::new(vec![user], vec![], "dc=example,dc=com".into());
    let stats = Stats::new();

    let result = bind("cn=bob,ou=users,dc=example,dc=com", "letmein", &store, None, &stats).await;
    assert_eq!(result, ResultCode::Success);
}

/// Scenario 3: carol needs the current TOTP code appended; a wrong code
/// fails even though it strips the same number of characters.
#[tokio::test]
async fn scenario_carol_totp_bind() {
    use data_encoding::BASE32_NOPAD;
    use totp_rs::{Algorithm, TOTP};

    let secret = "JBSWY3DPEHPK3PXP";
    let user = User {
        password: ssha256("p@ss", ""),
        otp_secret: Some(secret.to_string()),
        ..bare_user("carol")
    };
    let store = EntityStore::new(vec![user], vec![], "dc=example,dc=com".into());
    let stats = Stats::new();

    let bytes = BASE32_NOPAD.decode(secret.as_bytes()).unwrap();
    let code = TOTP::new(Algorithm::SHA1, 6, 1, 30, bytes).unwrap().generate_current().unwrap();

    let ok = bind(
        "cn=carol,ou=users,dc=example,dc=com",
        &format!("p@ss{code}"),
        &store,
        None,
        &stats,
    )
    .await;
    assert_eq!(ok, ResultCode::Success);

    let bad = bind(
        "cn=carol,ou=users,dc=example,dc=com",
        "p@ss000000",
        &store,
        None,
        &stats,
    )
    .await;
    assert_eq!(bad, ResultCode::InvalidCredentials);
}

/// Scenario 4: dave's hardware-token identifier must match before the
/// suffix is even stripped; without a configured verifier the branch is
/// skipped entirely and the whole password is treated as the stored one.
#[tokio::test]
async fn scenario_dave_hardware_token_identifier_mismatch() {
    let user = User {
        password: ssha256("swordfish", ""),
        hardware_token_id: Some("ccccccbcgujh".into()),
        ..bare_user("dave")
    };
    let store = EntityStore::new(vec![user], vec![], "dc=example,dc=com".into());
    let stats = Stats::new();

    let mismatched_token = "d".repeat(44);
    let result = bind(
        "cn=dave,ou=users,dc=example,dc=com",
        &format!("swordfish{mismatched_token}"),
        &store,
        None,
        &stats,
    )
    .await;
    assert_eq!(result, ResultCode::InvalidCredentials);
}

/// Scenario 5: an empty search base returns only groups for a groups
/// filter, and a `ou=users,...` base returns only users.
#[tokio::test]
async fn scenario_search_scoping_by_object_class_and_base() {
    let user = User { member_of: vec!["admins".into()], ..bare_user("alice") };
    let group = Group { cn: "admins".into(), description: None };
    let store = EntityStore::new(vec![user], vec![group], "dc=example,dc=com".into());
    let stats = Stats::new();

    let groups_only = search(
        "cn=alice,ou=users,dc=example,dc=com",
        "",
        &dapd_lib::proto::Filter::Equality("objectClass".into(), "groupOfNames".into()),
        &store,
        &stats,
    );
    assert_eq!(groups_only.entries.len(), 1);
    assert!(groups_only.entries[0].dn.starts_with("cn=admins,ou=groups"));

    let users_only = search(
        "cn=alice,ou=users,dc=example,dc=com",
        "ou=users,dc=example,dc=com",
        &dapd_lib::proto::Filter::Present("objectClass".into()),
        &store,
        &stats,
    );
    assert_eq!(users_only.entries.len(), 1);
    assert!(users_only.entries[0].dn.starts_with("cn=alice,ou=users"));
}

/// Scenario 6: an unsupported object-class filter is an operations error.
#[tokio::test]
async fn scenario_unsupported_filter_is_operations_error() {
    let store = EntityStore::new(vec![bare_user("alice")], vec![], "dc=example,dc=com".into());
    let stats = Stats::new();

    let outcome = search(
        "cn=alice,ou=users,dc=example,dc=com",
        "",
        &dapd_lib::proto::Filter::Equality("objectClass".into(), "device".into()),
        &store,
        &stats,
    );
    assert_eq!(outcome.code, ResultCode::OperationsError);
}
