//! Search filter model.
//!
//! Full filter evaluation against an entry's attributes is not this
//! daemon's job — every object class this directory knows about is small
//! and flat, so the only thing a search handler needs out of the filter is
//! the value bound to `objectClass=` at the top level. Everything else
//! just has to parse well enough to be recognised as "not that".

use crate::ber::{read_tlv, Tlv};
use crate::error::{ProtoError, ProtoResult};

const TAG_AND: u8 = 0xA0;
const TAG_OR: u8 = 0xA1;
const TAG_NOT: u8 = 0xA2;
const TAG_EQUALITY: u8 = 0xA3;
const TAG_SUBSTRINGS: u8 = 0xA4;
const TAG_GREATER_OR_EQUAL: u8 = 0xA5;
const TAG_LESS_OR_EQUAL: u8 = 0xA6;
const TAG_PRESENT: u8 = 0x87;
const TAG_APPROX_MATCH: u8 = 0xA8;
const TAG_EXTENSIBLE_MATCH: u8 = 0xA9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Equality(String, String),
    Present(String),
    /// Substrings, ordering matches, extensible matches — parsed enough to
    /// skip over, never evaluated.
    Other,
}

pub fn parse(tlv: &Tlv) -> ProtoResult<Filter> {
    match tlv.tag {
        TAG_AND => Ok(Filter::And(parse_filter_set(&tlv.value)?)),
        TAG_OR => Ok(Filter::Or(parse_filter_set(&tlv.value)?)),
        TAG_NOT => {
            let (inner, _) = read_tlv(&tlv.value)?;
            Ok(Filter::Not(Box::new(parse(&inner)?)))
        }
        TAG_EQUALITY => {
            let (attr, val) = parse_attribute_value_assertion(&tlv.value)?;
            Ok(Filter::Equality(attr, val))
        }
        TAG_PRESENT => {
            let attr = String::from_utf8(tlv.value.clone())
                .map_err(|e| ProtoError::bad_utf8(e.to_string()))?;
            Ok(Filter::Present(attr))
        }
        TAG_SUBSTRINGS
        | TAG_GREATER_OR_EQUAL
        | TAG_LESS_OR_EQUAL
        | TAG_APPROX_MATCH
        | TAG_EXTENSIBLE_MATCH => Ok(Filter::Other),
        _ => Err(ProtoError::unexpected_tag(format!("unknown filter tag 0x{:02X}", tlv.tag))),
    }
}

fn parse_filter_set(buf: &[u8]) -> ProtoResult<Vec<Filter>> {
    let mut out = Vec::new();
    let mut offset = 0;
    while offset < buf.len() {
        let (tlv, consumed) = read_tlv(&buf[offset..])?;
        out.push(parse(&tlv)?);
        offset += consumed;
    }
    Ok(out)
}

fn parse_attribute_value_assertion(buf: &[u8]) -> ProtoResult<(String, String)> {
    let (attr_tlv, consumed) = read_tlv(buf)?;
    let (val_tlv, _) = read_tlv(&buf[consumed..])?;
    let attr =
        String::from_utf8(attr_tlv.value).map_err(|e| ProtoError::bad_utf8(e.to_string()))?;
    let val = String::from_utf8(val_tlv.value).map_err(|e| ProtoError::bad_utf8(e.to_string()))?;
    Ok((attr, val))
}

/// The value bound to `objectClass=` at the top level of the filter, if
/// there is one. `None` means "no object-class constraint" — the caller
/// should treat that as matching both users and groups.
pub fn top_level_object_class(filter: &Filter) -> Option<String> {
    match filter {
        Filter::Equality(attr, val) if attr.eq_ignore_ascii_case("objectClass") => {
            Some(val.clone())
        }
        Filter::And(children) | Filter::Or(children) => {
            children.iter().find_map(top_level_object_class)
        }
        _ => None,
    }
}
