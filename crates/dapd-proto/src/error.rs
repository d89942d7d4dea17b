//! Wire-decoding error type.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ProtoErrorKind {
    Truncated,
    UnexpectedTag,
    BadLength,
    BadUtf8,
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct ProtoError {
    pub kind: ProtoErrorKind,
    pub message: String,
}

pub type ProtoResult<T> = Result<T, ProtoError>;

impl ProtoError {
    pub fn new(kind: ProtoErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn truncated(message: impl Into<String>) -> Self {
        Self::new(ProtoErrorKind::Truncated, message)
    }

    pub fn unexpected_tag(message: impl Into<String>) -> Self {
        Self::new(ProtoErrorKind::UnexpectedTag, message)
    }

    pub fn bad_length(message: impl Into<String>) -> Self {
        Self::new(ProtoErrorKind::BadLength, message)
    }

    pub fn bad_utf8(message: impl Into<String>) -> Self {
        Self::new(ProtoErrorKind::BadUtf8, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ProtoErrorKind::Unsupported, message)
    }
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ProtoError {}

impl From<ProtoError> for std::io::Error {
    fn from(e: ProtoError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    }
}
