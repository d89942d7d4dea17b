//! The message shapes this daemon parses and emits.
//!
//! Only the operations this directory actually serves are modelled: bind,
//! unbind, and search. Anything else arrives as [`ProtocolOp::Unsupported`]
//! so the caller can answer with `OperationsError` instead of dropping the
//! connection.

use crate::ber::{
    self, decode_integer, decode_octet_string, encode_constructed, encode_enumerated,
    encode_integer, encode_octet_string, read_tlv, Tlv, TAG_INTEGER, TAG_SEQUENCE,
};
use crate::error::{ProtoError, ProtoResult};
use crate::filter::{self, Filter};
use crate::result::ResultCode;

const APP_BIND_REQUEST: u8 = 0x60;
const APP_BIND_RESPONSE: u8 = 0x61;
const APP_UNBIND_REQUEST: u8 = 0x42;
const APP_SEARCH_REQUEST: u8 = 0x63;
const APP_SEARCH_RESULT_ENTRY: u8 = 0x64;
const APP_SEARCH_RESULT_DONE: u8 = 0x65;

const CTX_SIMPLE_AUTH: u8 = 0x80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapMessage {
    pub message_id: i64,
    pub op: ProtocolOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolOp {
    BindRequest(BindRequest),
    BindResponse(LdapResult),
    UnbindRequest,
    SearchRequest(SearchRequest),
    SearchResultEntry(SearchResultEntry),
    SearchResultDone(LdapResult),
    /// Any application tag this daemon doesn't implement.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindRequest {
    pub version: i64,
    pub name: String,
    pub credentials: BindCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindCredentials {
    Simple(String),
    /// SASL or any other auth choice — this daemon only speaks simple
    /// binds.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapResult {
    pub code: ResultCode,
    pub matched_dn: String,
    pub message: String,
}

impl LdapResult {
    pub fn success() -> Self {
        Self { code: ResultCode::Success, matched_dn: String::new(), message: String::new() }
    }

    pub fn error(code: ResultCode, message: impl Into<String>) -> Self {
        Self { code, matched_dn: String::new(), message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub base_object: String,
    pub scope: i64,
    pub filter: Filter,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultEntry {
    pub dn: String,
    pub attributes: Vec<(String, Vec<String>)>,
}

// ---------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------

/// Decode one full `LDAPMessage` SEQUENCE (already framed — see
/// [`crate::codec`] for reading a complete TLV off the wire first).
pub fn decode_message(bytes: &[u8]) -> ProtoResult<LdapMessage> {
    let (envelope, consumed) = read_tlv(bytes)?;
    if envelope.tag != TAG_SEQUENCE {
        return Err(ProtoError::unexpected_tag("LDAPMessage must be a SEQUENCE"));
    }
    if consumed != bytes.len() {
        return Err(ProtoError::bad_length("trailing bytes after LDAPMessage"));
    }
    let body = envelope.value;
    let (id_tlv, id_consumed) = read_tlv(&body)?;
    if id_tlv.tag != TAG_INTEGER {
        return Err(ProtoError::unexpected_tag("messageID must be an INTEGER"));
    }
    let message_id = decode_integer(&id_tlv.value)?;

    let (op_tlv, _) = read_tlv(&body[id_consumed..])?;
    let op = decode_protocol_op(&op_tlv)?;
    Ok(LdapMessage { message_id, op })
}

fn decode_protocol_op(tlv: &Tlv) -> ProtoResult<ProtocolOp> {
    match tlv.tag {
        APP_BIND_REQUEST => Ok(ProtocolOp::BindRequest(decode_bind_request(&tlv.value)?)),
        APP_UNBIND_REQUEST => Ok(ProtocolOp::UnbindRequest),
        APP_SEARCH_REQUEST => Ok(ProtocolOp::SearchRequest(decode_search_request(&tlv.value)?)),
        _ => Ok(ProtocolOp::Unsupported),
    }
}

fn decode_bind_request(buf: &[u8]) -> ProtoResult<BindRequest> {
    let (version_tlv, c1) = read_tlv(buf)?;
    let version = decode_integer(&version_tlv.value)?;
    let (name_tlv, c2) = read_tlv(&buf[c1..])?;
    let name = decode_octet_string(&name_tlv.value)?;
    let (auth_tlv, _) = read_tlv(&buf[c1 + c2..])?;
    let credentials = if auth_tlv.tag == CTX_SIMPLE_AUTH {
        BindCredentials::Simple(decode_octet_string(&auth_tlv.value)?)
    } else {
        BindCredentials::Other
    };
    Ok(BindRequest { version, name, credentials })
}

fn decode_search_request(buf: &[u8]) -> ProtoResult<SearchRequest> {
    let mut offset = 0;

    let (base_tlv, c) = read_tlv(&buf[offset..])?;
    let base_object = decode_octet_string(&base_tlv.value)?;
    offset += c;

    let (scope_tlv, c) = read_tlv(&buf[offset..])?;
    let scope = decode_integer(&scope_tlv.value)?;
    offset += c;

    let (_deref_tlv, c) = read_tlv(&buf[offset..])?;
    offset += c;

    let (_size_tlv, c) = read_tlv(&buf[offset..])?;
    offset += c;

    let (_time_tlv, c) = read_tlv(&buf[offset..])?;
    offset += c;

    let (_types_only_tlv, c) = read_tlv(&buf[offset..])?;
    offset += c;

    let (filter_tlv, c) = read_tlv(&buf[offset..])?;
    let filter = filter::parse(&filter_tlv)?;
    offset += c;

    let attributes = if offset < buf.len() {
        let (attrs_tlv, _) = read_tlv(&buf[offset..])?;
        decode_attribute_list(&attrs_tlv.value)?
    } else {
        Vec::new()
    };

    Ok(SearchRequest { base_object, scope, filter, attributes })
}

fn decode_attribute_list(buf: &[u8]) -> ProtoResult<Vec<String>> {
    let mut out = Vec::new();
    let mut offset = 0;
    while offset < buf.len() {
        let (tlv, consumed) = read_tlv(&buf[offset..])?;
        out.push(decode_octet_string(&tlv.value)?);
        offset += consumed;
    }
    Ok(out)
}

// ---------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------

pub fn encode_message(msg: &LdapMessage) -> Vec<u8> {
    let id = encode_integer(msg.message_id);
    let op = encode_protocol_op(&msg.op);
    ber::encode_constructed(TAG_SEQUENCE, &[id, op])
}

fn encode_protocol_op(op: &ProtocolOp) -> Vec<u8> {
    match op {
        ProtocolOp::BindResponse(result) => encode_constructed(APP_BIND_RESPONSE, &encode_ldap_result_fields(result)),
        ProtocolOp::SearchResultEntry(entry) => encode_search_result_entry(entry),
        ProtocolOp::SearchResultDone(result) => {
            encode_constructed(APP_SEARCH_RESULT_DONE, &encode_ldap_result_fields(result))
        }
        ProtocolOp::UnbindRequest => ber::encode_tlv(APP_UNBIND_REQUEST, &[]),
        ProtocolOp::BindRequest(_) | ProtocolOp::SearchRequest(_) | ProtocolOp::Unsupported => {
            Vec::new()
        }
    }
}

fn encode_ldap_result_fields(result: &LdapResult) -> Vec<Vec<u8>> {
    vec![
        encode_enumerated(result.code.code()),
        encode_octet_string(&result.matched_dn),
        encode_octet_string(&result.message),
    ]
}

fn encode_search_result_entry(entry: &SearchResultEntry) -> Vec<u8> {
    let dn = encode_octet_string(&entry.dn);
    let attr_children: Vec<Vec<u8>> = entry
        .attributes
        .iter()
        .map(|(name, values)| {
            let vals: Vec<Vec<u8>> = values.iter().map(|v| encode_octet_string(v)).collect();
            encode_constructed(
                ber::TAG_SEQUENCE,
                &[encode_octet_string(name), encode_constructed(ber::TAG_SET, &vals)],
            )
        })
        .collect();
    let attrs = encode_constructed(ber::TAG_SEQUENCE, &attr_children);
    encode_constructed(APP_SEARCH_RESULT_ENTRY, &[dn, attrs])
}
