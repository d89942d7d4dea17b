//! Hand-rolled BER/DER TLV primitives.
//!
//! This daemon only ever has to speak a small, fixed subset of the wire
//! format (bind/unbind/search), so rather than pull in a general-purpose
//! ASN.1 crate we read and write the handful of tag/length/value shapes we
//! actually need, the same way the rest of this codebase parses its other
//! binary headers by hand with a cursor over a byte slice.

use crate::error::{ProtoError, ProtoResult};

pub const TAG_BOOLEAN: u8 = 0x01;
pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_ENUMERATED: u8 = 0x0A;
pub const TAG_SEQUENCE: u8 = 0x30;
pub const TAG_SET: u8 = 0x31;

/// One decoded tag/length/value unit, plus how many bytes it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    pub tag: u8,
    pub value: Vec<u8>,
}

/// Read one definite-length TLV from the front of `buf`. Returns the TLV
/// and the total number of bytes consumed (header + value). Indefinite
/// lengths (0x80) are not produced by any client this daemon supports and
/// are rejected.
pub fn read_tlv(buf: &[u8]) -> ProtoResult<(Tlv, usize)> {
    if buf.is_empty() {
        return Err(ProtoError::truncated("no tag byte"));
    }
    let tag = buf[0];
    let (len, len_bytes) = read_length(&buf[1..])?;
    let header_len = 1 + len_bytes;
    let total = header_len
        .checked_add(len)
        .ok_or_else(|| ProtoError::bad_length("length overflow"))?;
    if buf.len() < total {
        return Err(ProtoError::truncated("value shorter than declared length"));
    }
    let value = buf[header_len..total].to_vec();
    Ok((Tlv { tag, value }, total))
}

/// Peek at just the header (tag + length) to learn the total size of the
/// TLV before its value bytes have all arrived on the wire.
pub fn peek_header_len(buf: &[u8]) -> ProtoResult<Option<usize>> {
    if buf.is_empty() {
        return Ok(None);
    }
    match read_length(&buf[1..]) {
        Ok((len, len_bytes)) => Ok(Some(1 + len_bytes + len)),
        Err(_) => Ok(None),
    }
}

fn read_length(buf: &[u8]) -> ProtoResult<(usize, usize)> {
    if buf.is_empty() {
        return Err(ProtoError::truncated("no length byte"));
    }
    let first = buf[0];
    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }
    let n = (first & 0x7F) as usize;
    if n == 0 {
        return Err(ProtoError::unsupported("indefinite length not supported"));
    }
    if n > 8 {
        return Err(ProtoError::bad_length("length field too wide"));
    }
    if buf.len() < 1 + n {
        return Err(ProtoError::truncated("truncated long-form length"));
    }
    let mut len: usize = 0;
    for &b in &buf[1..1 + n] {
        len = (len << 8) | b as usize;
    }
    Ok((len, 1 + n))
}

fn encode_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        return vec![len as u8];
    }
    let bytes = len.to_be_bytes();
    let significant: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
    let significant = if significant.is_empty() { vec![0] } else { significant };
    let mut out = vec![0x80 | significant.len() as u8];
    out.extend(significant);
    out
}

pub fn encode_tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + value.len());
    out.push(tag);
    out.extend(encode_length(value.len()));
    out.extend_from_slice(value);
    out
}

/// Concatenate already-encoded children under a constructed tag (SEQUENCE,
/// SET, or a constructed context-tagged wrapper).
pub fn encode_constructed(tag: u8, children: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::new();
    for child in children {
        body.extend_from_slice(child);
    }
    encode_tlv(tag, &body)
}

pub fn encode_integer(n: i64) -> Vec<u8> {
    let mut bytes = n.to_be_bytes().to_vec();
    while bytes.len() > 1 && bytes[0] == 0x00 && bytes[1] & 0x80 == 0 {
        bytes.remove(0);
    }
    while bytes.len() > 1 && bytes[0] == 0xFF && bytes[1] & 0x80 != 0 {
        bytes.remove(0);
    }
    encode_tlv(TAG_INTEGER, &bytes)
}

pub fn decode_integer(value: &[u8]) -> ProtoResult<i64> {
    if value.is_empty() {
        return Err(ProtoError::bad_length("empty INTEGER"));
    }
    if value.len() > 8 {
        return Err(ProtoError::unsupported("INTEGER too wide for i64"));
    }
    let negative = value[0] & 0x80 != 0;
    let mut buf = [if negative { 0xFFu8 } else { 0x00 }; 8];
    let start = 8 - value.len();
    buf[start..].copy_from_slice(value);
    Ok(i64::from_be_bytes(buf))
}

pub fn encode_octet_string(s: &str) -> Vec<u8> {
    encode_tlv(TAG_OCTET_STRING, s.as_bytes())
}

pub fn decode_octet_string(value: &[u8]) -> ProtoResult<String> {
    String::from_utf8(value.to_vec()).map_err(|e| ProtoError::bad_utf8(e.to_string()))
}

pub fn encode_boolean(b: bool) -> Vec<u8> {
    encode_tlv(TAG_BOOLEAN, &[if b { 0xFF } else { 0x00 }])
}

pub fn decode_boolean(value: &[u8]) -> ProtoResult<bool> {
    Ok(value.first().copied().unwrap_or(0) != 0)
}

pub fn encode_enumerated(n: i64) -> Vec<u8> {
    let mut tlv = encode_integer(n);
    tlv[0] = TAG_ENUMERATED;
    tlv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_length_round_trips() {
        let tlv = encode_tlv(TAG_OCTET_STRING, b"hello");
        let (decoded, consumed) = read_tlv(&tlv).unwrap();
        assert_eq!(consumed, tlv.len());
        assert_eq!(decoded.tag, TAG_OCTET_STRING);
        assert_eq!(decoded.value, b"hello");
    }

    #[test]
    fn long_form_length_round_trips_for_large_payload() {
        let payload = vec![0x41u8; 300];
        let tlv = encode_tlv(TAG_OCTET_STRING, &payload);
        let (decoded, consumed) = read_tlv(&tlv).unwrap();
        assert_eq!(consumed, tlv.len());
        assert_eq!(decoded.value, payload);
    }

    #[test]
    fn truncated_buffer_is_an_error() {
        let tlv = encode_tlv(TAG_OCTET_STRING, b"hello world");
        assert!(read_tlv(&tlv[..4]).is_err());
    }

    #[test]
    fn integer_round_trips_negative_and_positive() {
        for n in [0i64, 1, -1, 127, 128, -128, 65536, -65536] {
            let encoded = encode_integer(n);
            let (tlv, _) = read_tlv(&encoded).unwrap();
            assert_eq!(decode_integer(&tlv.value).unwrap(), n, "n={n}");
        }
    }

    #[test]
    fn indefinite_length_is_rejected() {
        let buf = [TAG_SEQUENCE, 0x80];
        assert!(read_tlv(&buf).is_err());
    }
}
