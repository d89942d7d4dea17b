//! Errors from standing up the protocol front-end. Startup-time TLS
//! configuration failures are fatal;
//! everything else on the serving path is handled per-connection and never
//! surfaces here.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ServerErrorKind {
    Tls,
    Bind,
}

#[derive(Debug, Clone)]
pub struct ServerError {
    pub kind: ServerErrorKind,
    pub message: String,
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn new(kind: ServerErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn tls(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::Tls, message)
    }

    pub fn bind(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::Bind, message)
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ServerError {}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::bind(e.to_string())
    }
}
