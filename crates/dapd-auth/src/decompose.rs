//! Credential decomposition — strips OTP/hardware-token suffixes off a
//! bind password.
//!
//! The directory wire protocol carries a single password field, so a
//! second authentication factor is concatenated onto its tail by
//! convention: a 6-digit TOTP code, or a 44-character hardware-token OTP
//! (whose first 12 characters are the token's public identifier).

use crate::hardware_token::HardwareTokenVerifier;
use crate::{totp, AuthResult};

const HARDWARE_OTP_LEN: usize = 44;
const HARDWARE_ID_LEN: usize = 12;
const TOTP_CODE_LEN: usize = 6;

/// The subset of a user's second-factor configuration the decomposer needs.
/// Kept deliberately independent of any directory-entity type so this
/// crate has no dependency on `dapd-directory`.
pub struct SecondFactors<'a> {
    pub otp_secret: Option<&'a str>,
    pub hardware_token_id: Option<&'a str>,
}

/// Result of decomposing a bind password.
pub struct Decomposed {
    pub otp_valid: bool,
    pub residual: String,
}

/// Strip and verify any OTP/hardware-token suffix from `raw_password`.
///
/// `hardware_verifier` is `None` when no hardware-token service is
/// configured, which forces the hardware branch to be skipped even for a
/// user with a configured token id.
pub async fn decompose(
    factors: SecondFactors<'_>,
    raw_password: &str,
    hardware_verifier: Option<&HardwareTokenVerifier>,
) -> AuthResult<Decomposed> {
    if factors.otp_secret.is_none() && factors.hardware_token_id.is_none() {
        return Ok(Decomposed { otp_valid: true, residual: raw_password.to_string() });
    }

    let mut chars: Vec<char> = raw_password.chars().collect();
    let mut otp_valid = false;

    if let (Some(configured_id), Some(verifier)) =
        (factors.hardware_token_id, hardware_verifier)
    {
        if chars.len() > HARDWARE_OTP_LEN {
            let split_at = chars.len() - HARDWARE_OTP_LEN;
            let suffix: String = chars[split_at..].iter().collect();
            let candidate_id: String = suffix.chars().take(HARDWARE_ID_LEN).collect();

            if candidate_id == configured_id {
                chars.truncate(split_at);
                otp_valid = verifier.verify(&suffix).await.unwrap_or(false);
            } else {
                tracing::debug!("hardware-token identifier mismatch on bind");
            }
        }
    }

    if !otp_valid {
        if let Some(secret) = factors.otp_secret {
            if chars.len() > TOTP_CODE_LEN {
                let split_at = chars.len() - TOTP_CODE_LEN;
                let code: String = chars[split_at..].iter().collect();
                let candidate_residual: Vec<char> = chars[..split_at].to_vec();

                match totp::validate(&code, secret) {
                    Ok(true) => {
                        otp_valid = true;
                        chars = candidate_residual;
                    }
                    Ok(false) => {
                        // Code didn't validate: the suffix is stripped
                        // from the residual regardless, so the password
                        // check below never sees the trailing digits.
                        chars = candidate_residual;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "TOTP validation error during bind");
                        chars = candidate_residual;
                    }
                }
            }
        }
    }

    Ok(Decomposed { otp_valid, residual: chars.into_iter().collect() })
}
