//! Credential-verification error type.

use std::fmt;

/// Categorised credential-verification failure.
///
/// Every variant collapses to `InvalidCredentials` at the protocol boundary
/// (see `dapd-proto`'s result-code mapping) — this type exists so the
/// server can log the *real* root cause at `warning` without ever leaking
/// it to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthErrorKind {
    /// Stored password string missing `{scheme}` prefix, missing closing
    /// `}`, or decoded payload shorter than the scheme's digest length.
    FormatError,
    /// Base64 decoding of the stored payload failed.
    DecodeError,
    /// Scheme named in `{scheme}` is not one we recognise.
    UnsupportedScheme,
    /// Hash comparison failed.
    Mismatch,
    /// The OTP/HOTP factor was required and did not validate.
    OtpInvalid,
    /// The external hardware-token verifier could not be reached.
    VerifierUnavailable,
}

#[derive(Debug, Clone)]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    pub fn new(kind: AuthErrorKind, msg: impl Into<String>) -> Self {
        Self { kind, message: msg.into() }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::FormatError, msg)
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::DecodeError, msg)
    }

    pub fn unsupported_scheme(scheme: &str) -> Self {
        Self::new(AuthErrorKind::UnsupportedScheme, format!("unsupported scheme {scheme:?}"))
    }

    pub fn mismatch() -> Self {
        Self::new(AuthErrorKind::Mismatch, "password hash mismatch")
    }

    pub fn otp_invalid(msg: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::OtpInvalid, msg)
    }

    pub fn verifier_unavailable(msg: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::VerifierUnavailable, msg)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for AuthError {}
