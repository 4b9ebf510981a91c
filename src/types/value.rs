//! `Value` items and the shared key/value map codec used by `Area`,
//! `Proddef` and `Ensemble` (all GRIB-style "value bags" in the original).

use std::fmt::Write as _;

use crate::{err_at, types::Codec, util::varint, Result};

/// A scalar stored in a value bag: either an integer or a string, matching
/// the original's `ValueBag` entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scalar {
    Int(i64),
    Str(String),
}

pub type ValueMap = Vec<(String, Scalar)>;

fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// Encode a value bag, kept sorted by key so equal bags always encode
/// identically (summary merge and index uniqueness both rely on this).
pub fn encode_value_map(map: &ValueMap, out: &mut Vec<u8>) {
    let mut sorted = map.clone();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    varint::encode_usize(sorted.len(), out);
    for (key, val) in sorted {
        let key_bytes = key.as_bytes();
        varint::encode_usize(key_bytes.len(), out);
        out.extend_from_slice(key_bytes);
        match val {
            Scalar::Int(i) => {
                out.push(0);
                varint::encode_u64(zigzag_encode(i), out);
            }
            Scalar::Str(s) => {
                out.push(1);
                let bytes = s.as_bytes();
                varint::encode_usize(bytes.len(), out);
                out.extend_from_slice(bytes);
            }
        }
    }
}

pub fn decode_value_map(buf: &[u8]) -> Result<ValueMap> {
    let (count, mut pos) = varint::decode_usize(buf)?;
    let mut map = Vec::with_capacity(count);
    for _ in 0..count {
        let (klen, n) = varint::decode_usize(&buf[pos..])?;
        pos += n;
        let key = err_at!(
            ParseError,
            String::from_utf8(buf[pos..pos + klen].to_vec())
        )?;
        pos += klen;
        let tag = buf[pos];
        pos += 1;
        let val = match tag {
            0 => {
                let (raw, n) = varint::decode_u64(&buf[pos..])?;
                pos += n;
                Scalar::Int(zigzag_decode(raw))
            }
            1 => {
                let (slen, n) = varint::decode_usize(&buf[pos..])?;
                pos += n;
                let s = err_at!(
                    ParseError,
                    String::from_utf8(buf[pos..pos + slen].to_vec())
                )?;
                pos += slen;
                Scalar::Str(s)
            }
            other => return err_at!(ParseError, msg: "unknown value-bag tag {}", other),
        };
        map.push((key, val));
    }
    Ok(map)
}

pub fn value_map_to_text(map: &ValueMap) -> String {
    let mut sorted = map.clone();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    let mut out = String::new();
    for (i, (key, val)) in sorted.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match val {
            Scalar::Int(n) => {
                let _ = write!(out, "{}={}", key, n);
            }
            Scalar::Str(s) => {
                let _ = write!(out, "{}={}", key, s);
            }
        }
    }
    out
}

/// Free-form `key=value` metadata annotation (§3's "Value" kind): a single
/// opaque pair not otherwise modeled by a dedicated kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Value {
    pub key: String,
    pub value: String,
}

impl Codec for Value {
    fn encode_body(&self, out: &mut Vec<u8>) {
        let key = self.key.as_bytes();
        varint::encode_usize(key.len(), out);
        out.extend_from_slice(key);
        out.extend_from_slice(self.value.as_bytes());
    }

    fn decode_body(buf: &[u8]) -> Result<Value> {
        let (klen, n) = varint::decode_usize(buf)?;
        let key = err_at!(ParseError, String::from_utf8(buf[n..n + klen].to_vec()))?;
        let value = err_at!(ParseError, String::from_utf8(buf[n + klen..].to_vec()))?;
        Ok(Value { key, value })
    }

    fn to_text(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod value_test;
