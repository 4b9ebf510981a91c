//! `AssignedDataset`: stamped onto a message once the dispatcher has routed
//! it to a dataset (§4.9), so re-dispatch can recognize already-filed data.

use crate::{err_at, types::Codec, util::varint, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssignedDataset {
    pub name: String,
    pub id: String,
}

impl Codec for AssignedDataset {
    fn encode_body(&self, out: &mut Vec<u8>) {
        let name = self.name.as_bytes();
        varint::encode_usize(name.len(), out);
        out.extend_from_slice(name);
        out.extend_from_slice(self.id.as_bytes());
    }

    fn decode_body(buf: &[u8]) -> Result<AssignedDataset> {
        let (len, n) = varint::decode_usize(buf)?;
        let name = err_at!(ParseError, String::from_utf8(buf[n..n + len].to_vec()))?;
        let id = err_at!(ParseError, String::from_utf8(buf[n + len..].to_vec()))?;
        Ok(AssignedDataset { name, id })
    }

    fn to_text(&self) -> String {
        format!("{}:{}", self.name, self.id)
    }
}

#[cfg(test)]
#[path = "assigned_dataset_test.rs"]
mod assigned_dataset_test;
