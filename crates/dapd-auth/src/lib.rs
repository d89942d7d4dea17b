//! # dapd-auth
//!
//! Credential verification for the directory daemon: salted-hash password
//! checking, TOTP/hardware-token decomposition, and the optional external
//! hardware-token verifier.

pub mod decompose;
pub mod error;
pub mod hardware_token;
pub mod password;
pub mod totp;

pub use decompose::{decompose, Decomposed, SecondFactors};
pub use error::{AuthError, AuthErrorKind, AuthResult};
pub use hardware_token::{HardwareTokenConfig, HardwareTokenVerifier};
