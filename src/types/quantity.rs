//! `Quantity`: the set of physical quantities a message carries (e.g. `t`,
//! `td`), stored sorted so equal sets encode identically.

use crate::{types::Codec, util::varint, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity {
    pub names: Vec<String>,
}

impl Codec for Quantity {
    fn encode_body(&self, out: &mut Vec<u8>) {
        let mut names = self.names.clone();
        names.sort();
        varint::encode_usize(names.len(), out);
        for name in names {
            let bytes = name.as_bytes();
            varint::encode_usize(bytes.len(), out);
            out.extend_from_slice(bytes);
        }
    }

    fn decode_body(buf: &[u8]) -> Result<Quantity> {
        let (count, mut pos) = varint::decode_usize(buf)?;
        let mut names = Vec::with_capacity(count);
        for _ in 0..count {
            let (len, n) = varint::decode_usize(&buf[pos..])?;
            pos += n;
            let name = crate::err_at!(ParseError, String::from_utf8(buf[pos..pos + len].to_vec()))?;
            pos += len;
            names.push(name);
        }
        Ok(Quantity { names })
    }

    fn to_text(&self) -> String {
        let mut names = self.names.clone();
        names.sort();
        names.join(",")
    }
}

#[cfg(test)]
#[path = "quantity_test.rs"]
mod quantity_test;
