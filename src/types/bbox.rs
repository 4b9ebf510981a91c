//! `BBox`: decode-only bounding-box annex, kept opaque (Open Question
//! C.3 in `SPEC_FULL.md`): the original derives it from `Area` on demand
//! via an external geometry library we don't carry, so we store whatever
//! bytes a producer wrote and never construct new values ourselves.

use crate::{types::Codec, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BBox {
    pub raw: Vec<u8>,
}

impl Codec for BBox {
    fn encode_body(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.raw);
    }

    fn decode_body(buf: &[u8]) -> Result<BBox> {
        Ok(BBox { raw: buf.to_vec() })
    }

    fn to_text(&self) -> String {
        self.raw.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
#[path = "bbox_test.rs"]
mod bbox_test;
