//! TOTP validation — 30-second step, SHA-1, 6 digits (RFC 6238 defaults).

use totp_rs::{Algorithm, TOTP};

use crate::error::{AuthError, AuthResult};

/// Validate a 6-digit TOTP `code` against a base32-encoded `secret`.
///
/// Uses the current wall-clock time and the standard window (no extra
/// skew tolerance beyond what `totp-rs` itself allows for the current and
/// immediately preceding step).
pub fn validate(code: &str, secret_base32: &str) -> AuthResult<bool> {
    let secret_bytes = data_encoding::BASE32_NOPAD
        .decode(secret_base32.trim_end_matches('=').to_uppercase().as_bytes())
        .map_err(|e| AuthError::otp_invalid(format!("bad base32 OTP secret: {e}")))?;

    let totp = TOTP::new(Algorithm::SHA1, 6, 1, 30, secret_bytes)
        .map_err(|e| AuthError::otp_invalid(format!("could not construct TOTP: {e}")))?;

    totp.check_current(code)
        .map_err(|e| AuthError::otp_invalid(format!("could not evaluate TOTP: {e}")))
}
