//! `Source`: where a message's raw bytes live, grounded on
//! `original_source/arki/types/source/blob.cc`'s Blob/Inline styles.

use crate::{err_at, types::Codec, util::varint, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    /// Bytes live in a segment file, at `offset..offset+size`.
    Blob { format: String, basedir: String, filename: String, offset: u64, size: u64 },
    /// Bytes are carried alongside the metadata (e.g. in a summary or a
    /// freshly-scanned-but-not-yet-dispatched message).
    Inline { format: String, size: u64 },
}

const STYLE_BLOB: u8 = 1;
const STYLE_INLINE: u8 = 2;

fn encode_string(s: &str, out: &mut Vec<u8>) {
    let bytes = s.as_bytes();
    varint::encode_usize(bytes.len(), out);
    out.extend_from_slice(bytes);
}

fn decode_string(buf: &[u8]) -> Result<(String, usize)> {
    let (len, n) = varint::decode_usize(buf)?;
    let s = err_at!(ParseError, String::from_utf8(buf[n..n + len].to_vec()))?;
    Ok((s, n + len))
}

impl Codec for Source {
    fn encode_body(&self, out: &mut Vec<u8>) {
        match self {
            Source::Blob { format, basedir, filename, offset, size } => {
                out.push(STYLE_BLOB);
                encode_string(format, out);
                encode_string(basedir, out);
                encode_string(filename, out);
                varint::encode_u64(*offset, out);
                varint::encode_u64(*size, out);
            }
            Source::Inline { format, size } => {
                out.push(STYLE_INLINE);
                encode_string(format, out);
                varint::encode_u64(*size, out);
            }
        }
    }

    fn decode_body(buf: &[u8]) -> Result<Source> {
        if buf.is_empty() {
            return err_at!(ParseError, msg: "empty source body");
        }
        let mut pos = 1;
        match buf[0] {
            STYLE_BLOB => {
                let (format, n) = decode_string(&buf[pos..])?;
                pos += n;
                let (basedir, n) = decode_string(&buf[pos..])?;
                pos += n;
                let (filename, n) = decode_string(&buf[pos..])?;
                pos += n;
                let (offset, n) = varint::decode_u64(&buf[pos..])?;
                pos += n;
                let (size, _) = varint::decode_u64(&buf[pos..])?;
                Ok(Source::Blob { format, basedir, filename, offset, size })
            }
            STYLE_INLINE => {
                let (format, n) = decode_string(&buf[pos..])?;
                pos += n;
                let (size, _) = varint::decode_u64(&buf[pos..])?;
                Ok(Source::Inline { format, size })
            }
            other => err_at!(ParseError, msg: "unknown source style {}", other),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Source::Blob { format, basedir, filename, offset, size } => {
                format!("{}:{}:{}:{}+{}", format, basedir, filename, offset, size)
            }
            Source::Inline { format, size } => format!("{}:-:{}", format, size),
        }
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod source_test;
