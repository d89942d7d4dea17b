//! Bind handler.

use dapd_auth::decompose::{decompose, SecondFactors};
use dapd_auth::hardware_token::HardwareTokenVerifier;
use dapd_auth::password;
use dapd_directory::EntityStore;
use dapd_proto::ResultCode;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::stats::Stats;

/// Run a bind. Never distinguishes "no such user" from
/// "wrong password" in its return value — only in the `tracing` events it
/// emits, which an operator (not a client) sees.
pub async fn bind(
    bind_dn: &str,
    bind_password: &str,
    store: &EntityStore,
    hardware_verifier: Option<&HardwareTokenVerifier>,
    stats: &Stats,
) -> ResultCode {
    stats.record_bind_req();

    let lowered = bind_dn.to_lowercase();
    let base_dn_suffix = format!(",{}", store.base_dn().to_lowercase());
    let Some(without_base) = lowered.strip_suffix(&base_dn_suffix) else {
        tracing::warn!(bind_dn, "bind outside base DN");
        return ResultCode::InvalidCredentials;
    };

    let Some(cn_part) = without_base.strip_suffix(",ou=users") else {
        tracing::warn!(bind_dn, "bind DN missing ,ou=users");
        return ResultCode::InvalidCredentials;
    };
    let Some(cn) = cn_part.strip_prefix("cn=") else {
        tracing::warn!(bind_dn, "bind DN missing cn= prefix");
        return ResultCode::InvalidCredentials;
    };

    let Some(user) = store.find_user(cn) else {
        tracing::warn!(cn, "bind for unknown user");
        return ResultCode::InvalidCredentials;
    };

    if !user.app_password_hashes.is_empty() {
        let digest = hex::encode(Sha256::digest(bind_password.as_bytes()));
        let matches_app_password = user
            .app_password_hashes
            .iter()
            .any(|stored| constant_time_str_eq(stored, &digest));
        if matches_app_password {
            stats.record_bind_success();
            return ResultCode::Success;
        }
    }

    let factors = SecondFactors {
        otp_secret: user.otp_secret.as_deref(),
        hardware_token_id: user.hardware_token_id.as_deref(),
    };
    let decomposed = match decompose(factors, bind_password, hardware_verifier).await {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(cn, error = %e, "credential decomposition failed");
            return ResultCode::InvalidCredentials;
        }
    };

    if !decomposed.otp_valid {
        tracing::warn!(cn, "second factor invalid");
        return ResultCode::InvalidCredentials;
    }

    match password::verify(&user.password, &decomposed.residual) {
        Ok(()) => {
            stats.record_bind_success();
            ResultCode::Success
        }
        Err(e) => {
            tracing::warn!(cn, error = %e, "password verification failed");
            ResultCode::InvalidCredentials
        }
    }
}

/// Constant-time comparison of two equal-or-unequal-length hex digests.
/// Unequal lengths short-circuit (leaks only the length, not content).
fn constant_time_str_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
