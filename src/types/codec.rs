//! The on-disk metadata envelope: `<kind_varint><length_varint><body>`,
//! plus the bundle header (`MM`/`MD` + u16 version) that wraps a full
//! `ItemSet` record (§4.1, §6).

use crate::{err_at, types::KindCode, util::varint, Result};

/// Encode a single item's body behind its kind/length envelope.
pub fn encode_envelope(kind: KindCode, body: &[u8], out: &mut Vec<u8>) {
    varint::encode_usize(kind as usize, out);
    varint::encode_usize(body.len(), out);
    out.extend_from_slice(body);
}

/// Decode one envelope from the front of `buf`.
/// Returns (kind, body slice, total bytes consumed).
pub fn decode_envelope(buf: &[u8]) -> Result<(KindCode, &[u8], usize)> {
    let (kind_raw, n1) = varint::decode_usize(buf)?;
    let kind = KindCode::from_usize(kind_raw)?;
    let (len, n2) = varint::decode_usize(&buf[n1..])?;
    let start = n1 + n2;
    let end = start
        .checked_add(len)
        .ok_or_else(|| crate::Error::ParseError("codec".into(), "envelope length overflow".into()))?;
    if buf.len() < end {
        return err_at!(ParseError, msg: "truncated envelope body: want {} have {}", len, buf.len() - start);
    }
    Ok((kind, &buf[start..end], end))
}

pub const BUNDLE_METADATA: &[u8; 2] = b"MM";
pub const BUNDLE_SUMMARY_ITEM: &[u8; 2] = b"MD";
pub const BUNDLE_VERSION: u16 = 1;

/// Write a bundle header: 2-byte signature, u16 BE version, u32 BE length,
/// then the body. This is the format `readBundle` in the original decodes.
pub fn encode_bundle(signature: &[u8; 2], body: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(signature);
    out.extend_from_slice(&BUNDLE_VERSION.to_be_bytes());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
}

/// Decode one bundle from the front of `buf`. Leading zero bytes (padding)
/// are skipped, matching the original's `readBundle`.
/// Returns (signature, version, body slice, total bytes consumed).
pub fn decode_bundle(buf: &[u8]) -> Result<([u8; 2], u16, &[u8], usize)> {
    let mut pos = 0;
    while pos < buf.len() && buf[pos] == 0 {
        pos += 1;
    }
    if buf.len() - pos < 8 {
        return err_at!(ParseError, msg: "truncated bundle header");
    }
    let sig = [buf[pos], buf[pos + 1]];
    let version = u16::from_be_bytes([buf[pos + 2], buf[pos + 3]]);
    let len = u32::from_be_bytes([buf[pos + 4], buf[pos + 5], buf[pos + 6], buf[pos + 7]]) as usize;
    let start = pos + 8;
    let end = start + len;
    if buf.len() < end {
        return err_at!(ParseError, msg: "truncated bundle body: want {} have {}", len, buf.len() - start);
    }
    Ok((sig, version, &buf[start..end], end - pos))
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;
