//! `Task`: free-form processing-task label attached by a scanner.

use crate::{err_at, types::Codec, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Task {
    pub name: String,
}

impl Codec for Task {
    fn encode_body(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.name.as_bytes());
    }

    fn decode_body(buf: &[u8]) -> Result<Task> {
        let name = err_at!(ParseError, String::from_utf8(buf.to_vec()))?;
        Ok(Task { name })
    }

    fn to_text(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;
