//! `Note`: free-form annotations accumulated during processing. Order is
//! preserved; several notes can accumulate on one item over its lifetime.

use crate::{err_at, types::Codec, util::varint, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NoteEntry {
    pub timestamp: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Note {
    pub entries: Vec<NoteEntry>,
}

fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

impl Codec for Note {
    fn encode_body(&self, out: &mut Vec<u8>) {
        varint::encode_usize(self.entries.len(), out);
        for entry in &self.entries {
            varint::encode_u64(zigzag_encode(entry.timestamp), out);
            let bytes = entry.text.as_bytes();
            varint::encode_usize(bytes.len(), out);
            out.extend_from_slice(bytes);
        }
    }

    fn decode_body(buf: &[u8]) -> Result<Note> {
        let (count, mut pos) = varint::decode_usize(buf)?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let (ts_raw, n) = varint::decode_u64(&buf[pos..])?;
            pos += n;
            let (len, n) = varint::decode_usize(&buf[pos..])?;
            pos += n;
            let text = err_at!(ParseError, String::from_utf8(buf[pos..pos + len].to_vec()))?;
            pos += len;
            entries.push(NoteEntry { timestamp: zigzag_decode(ts_raw), text });
        }
        Ok(Note { entries })
    }

    fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("[{}]{}", e.timestamp, e.text))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
#[path = "note_test.rs"]
mod note_test;
