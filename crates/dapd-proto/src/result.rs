//! Result codes this daemon can return.

/// Subset of the standard LDAP result-code space this daemon actually
/// produces. Numeric values match the wire protocol's registry so clients
/// that don't know this is a bespoke server still get sensible behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    OperationsError,
    InvalidCredentials,
    InsufficientAccessRights,
}

impl ResultCode {
    pub fn code(self) -> i64 {
        match self {
            ResultCode::Success => 0,
            ResultCode::OperationsError => 1,
            ResultCode::InvalidCredentials => 49,
            ResultCode::InsufficientAccessRights => 50,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ResultCode::Success)
    }
}
