//! `Reftime`: either a single instant or a `[begin, end]` period (§3).
//! Periods are half-open in documentation only; the original stores both
//! ends inclusive and so do we.

use chrono::{NaiveDateTime, TimeZone, Utc};

use crate::{err_at, types::Codec, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reftime {
    Position(NaiveDateTime),
    Period(NaiveDateTime, NaiveDateTime),
}

impl Reftime {
    /// The instant used for archive/delete-age computation: a period's
    /// *end*, or the position itself (Open Question C.1).
    pub fn age_instant(&self) -> NaiveDateTime {
        match self {
            Reftime::Position(t) => *t,
            Reftime::Period(_, end) => *end,
        }
    }

    pub fn begin(&self) -> NaiveDateTime {
        match self {
            Reftime::Position(t) => *t,
            Reftime::Period(begin, _) => *begin,
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        match self {
            Reftime::Position(t) => *t,
            Reftime::Period(_, end) => *end,
        }
    }
}

const STYLE_POSITION: u8 = 1;
const STYLE_PERIOD: u8 = 2;

fn encode_datetime(t: &NaiveDateTime, out: &mut Vec<u8>) {
    out.extend_from_slice(&t.and_utc().timestamp().to_be_bytes());
}

fn decode_datetime(buf: &[u8]) -> Result<NaiveDateTime> {
    if buf.len() != 8 {
        return err_at!(ParseError, msg: "malformed reftime timestamp");
    }
    let secs = i64::from_be_bytes(buf.try_into().unwrap());
    Ok(Utc.timestamp_opt(secs, 0).single().unwrap().naive_utc())
}

impl Codec for Reftime {
    fn encode_body(&self, out: &mut Vec<u8>) {
        match self {
            Reftime::Position(t) => {
                out.push(STYLE_POSITION);
                encode_datetime(t, out);
            }
            Reftime::Period(begin, end) => {
                out.push(STYLE_PERIOD);
                encode_datetime(begin, out);
                encode_datetime(end, out);
            }
        }
    }

    fn decode_body(buf: &[u8]) -> Result<Reftime> {
        if buf.is_empty() {
            return err_at!(ParseError, msg: "empty reftime body");
        }
        match buf[0] {
            STYLE_POSITION if buf.len() == 9 => Ok(Reftime::Position(decode_datetime(&buf[1..9])?)),
            STYLE_PERIOD if buf.len() == 17 => Ok(Reftime::Period(
                decode_datetime(&buf[1..9])?,
                decode_datetime(&buf[9..17])?,
            )),
            other => err_at!(ParseError, msg: "unknown reftime style {}", other),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Reftime::Position(t) => t.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            Reftime::Period(begin, end) => format!(
                "{} to {}",
                begin.format("%Y-%m-%dT%H:%M:%SZ"),
                end.format("%Y-%m-%dT%H:%M:%SZ")
            ),
        }
    }
}

#[cfg(test)]
#[path = "reftime_test.rs"]
mod reftime_test;
