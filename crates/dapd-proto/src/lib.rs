//! # dapd-proto
//!
//! A hand-rolled BER codec and the narrow slice of the directory wire
//! protocol this daemon actually speaks: bind, unbind, and search.

pub mod ber;
pub mod codec;
pub mod error;
pub mod filter;
pub mod message;
pub mod result;

pub use codec::{read_message, write_message};
pub use error::{ProtoError, ProtoErrorKind, ProtoResult};
pub use filter::Filter;
pub use message::{
    BindCredentials, BindRequest, LdapMessage, LdapResult, ProtocolOp, SearchRequest,
    SearchResultEntry,
};
pub use result::ResultCode;
