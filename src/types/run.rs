//! `Run`: the model run's time of day.

use crate::{err_at, types::Codec, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Run {
    pub hour: u8,
    pub minute: u8,
}

impl Codec for Run {
    fn encode_body(&self, out: &mut Vec<u8>) {
        out.push(self.hour);
        out.push(self.minute);
    }

    fn decode_body(buf: &[u8]) -> Result<Run> {
        if buf.len() != 2 {
            return err_at!(ParseError, msg: "malformed run body");
        }
        Ok(Run { hour: buf[0], minute: buf[1] })
    }

    fn to_text(&self) -> String {
        format!("MINUTE({:02}:{:02})", self.hour, self.minute)
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod run_test;
