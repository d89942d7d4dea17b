//! Salted-hash password verification — `{SCHEME}base64(hash‖salt)`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{AuthError, AuthResult};

/// A recognised salted-hash scheme: its wire name and digest length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Ssha,
    Ssha256,
}

impl Scheme {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "SSHA" => Some(Scheme::Ssha),
            "SSHA256" => Some(Scheme::Ssha256),
            _ => None,
        }
    }

    fn digest_len(self) -> usize {
        match self {
            Scheme::Ssha => 20,
            Scheme::Ssha256 => 32,
        }
    }

    fn digest(self, candidate: &[u8], salt: &[u8]) -> Vec<u8> {
        match self {
            Scheme::Ssha => {
                let mut hasher = Sha1::new();
                sha1::Digest::update(&mut hasher, candidate);
                sha1::Digest::update(&mut hasher, salt);
                sha1::Digest::finalize(hasher).to_vec()
            }
            Scheme::Ssha256 => {
                let mut hasher = Sha256::new();
                hasher.update(candidate);
                hasher.update(salt);
                hasher.finalize().to_vec()
            }
        }
    }
}

/// Verify `candidate` against a stored `{scheme}base64(hash‖salt)` string.
///
/// Comparison of the computed and stored digests is constant-time, so a
/// client cannot learn anything about *how wrong* a guessed password was
/// from response latency.
pub fn verify(stored: &str, candidate: &str) -> AuthResult<()> {
    if !stored.starts_with('{') {
        return Err(AuthError::format("stored password missing leading '{'"));
    }
    let close = stored.find('}').ok_or_else(|| {
        AuthError::format("stored password missing closing '}'")
    })?;
    let scheme_name = &stored[1..close];
    let scheme = Scheme::parse(scheme_name)
        .ok_or_else(|| AuthError::unsupported_scheme(scheme_name))?;

    let payload = &stored[close + 1..];
    let decoded = STANDARD
        .decode(payload)
        .map_err(|e| AuthError::decode(e.to_string()))?;

    let digest_len = scheme.digest_len();
    if decoded.len() < digest_len {
        return Err(AuthError::format(format!(
            "decoded payload ({} bytes) shorter than digest length ({digest_len})",
            decoded.len()
        )));
    }
    let (hash, salt) = decoded.split_at(digest_len);

    let computed = scheme.digest(candidate.as_bytes(), salt);
    if computed.ct_eq(hash).into() {
        Ok(())
    } else {
        Err(AuthError::mismatch())
    }
}
