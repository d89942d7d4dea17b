//! Reading and writing whole `LDAPMessage`s off an async stream.
//!
//! Grounded on the same pattern as this codebase's other hand-rolled
//! framers: a small buffer, one read loop that grows the buffer until a
//! complete frame is available, then a pure decode step handed the
//! assembled bytes.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::ber::peek_header_len;
use crate::error::ProtoError;
use crate::message::{decode_message, encode_message, LdapMessage};

/// Read exactly one `LDAPMessage` from `reader`. Returns `Ok(None)` on a
/// clean EOF with no partial frame buffered — i.e. the peer closed the
/// connection between messages.
pub async fn read_message<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> std::io::Result<Option<LdapMessage>> {
    let mut buf = Vec::with_capacity(64);
    loop {
        if let Some(total) = peek_header_len(&buf)? {
            if buf.len() >= total {
                let msg = decode_message(&buf[..total])?;
                return Ok(Some(msg));
            }
        }
        let mut chunk = [0u8; 512];
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Err(ProtoError::truncated("connection closed mid-message").into());
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    msg: &LdapMessage,
) -> std::io::Result<()> {
    let bytes = encode_message(msg);
    writer.write_all(&bytes).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::{encode_constructed, encode_integer, TAG_SEQUENCE};
    use crate::message::ProtocolOp;
    use std::io::Cursor;

    fn unbind_bytes(id: i64) -> Vec<u8> {
        let op = crate::ber::encode_tlv(0x42, &[]);
        encode_constructed(TAG_SEQUENCE, &[encode_integer(id), op])
    }

    #[tokio::test]
    async fn reads_one_message_exactly() {
        let bytes = unbind_bytes(5);
        let mut cursor = Cursor::new(bytes);
        let msg = read_message(&mut cursor).await.unwrap().unwrap();
        assert_eq!(msg.message_id, 5);
        assert_eq!(msg.op, ProtocolOp::UnbindRequest);
    }

    #[tokio::test]
    async fn reads_two_back_to_back_messages_independently() {
        let mut bytes = unbind_bytes(1);
        bytes.extend(unbind_bytes(2));
        let mut cursor = Cursor::new(bytes);
        let first = read_message(&mut cursor).await.unwrap().unwrap();
        let second = read_message(&mut cursor).await.unwrap().unwrap();
        assert_eq!(first.message_id, 1);
        assert_eq!(second.message_id, 2);
    }

    #[tokio::test]
    async fn clean_eof_before_any_bytes_is_none() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert!(read_message(&mut cursor).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn eof_mid_message_is_an_error() {
        let full = unbind_bytes(1);
        let mut cursor = Cursor::new(full[..1].to_vec());
        assert!(read_message(&mut cursor).await.is_err());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let msg = crate::message::LdapMessage { message_id: 42, op: ProtocolOp::UnbindRequest };
        let mut buf = Vec::new();
        write_message(&mut buf, &msg).await.unwrap();
        let mut cursor = Cursor::new(buf);
        let decoded = read_message(&mut cursor).await.unwrap().unwrap();
        assert_eq!(decoded.message_id, 42);
    }
}
