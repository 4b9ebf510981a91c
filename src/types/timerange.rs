//! `Timerange`: temporal processing applied to a message (forecast step,
//! statistical accumulation window), grounded in
//! `original_source/arki/types/timerange.cc`'s GRIB1/Timedef styles.

use crate::{err_at, types::Codec, util::varint, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Timerange {
    Grib1 { kind_type: u8, unit: u8, p1: u32, p2: u32 },
    /// `step_len`/`step_unit` describe the forecast step; `stat_type` of 255
    /// means "instantaneous" and `stat_len`/`stat_unit` are then zero.
    Timedef { step_len: u32, step_unit: u8, stat_type: u8, stat_len: u32, stat_unit: u8 },
}

pub const STAT_INSTANT: u8 = 255;

const STYLE_GRIB1: u8 = 1;
const STYLE_TIMEDEF: u8 = 2;

impl Codec for Timerange {
    fn encode_body(&self, out: &mut Vec<u8>) {
        match self {
            Timerange::Grib1 { kind_type, unit, p1, p2 } => {
                out.push(STYLE_GRIB1);
                out.push(*kind_type);
                out.push(*unit);
                varint::encode_u64(*p1 as u64, out);
                varint::encode_u64(*p2 as u64, out);
            }
            Timerange::Timedef { step_len, step_unit, stat_type, stat_len, stat_unit } => {
                out.push(STYLE_TIMEDEF);
                varint::encode_u64(*step_len as u64, out);
                out.push(*step_unit);
                out.push(*stat_type);
                varint::encode_u64(*stat_len as u64, out);
                out.push(*stat_unit);
            }
        }
    }

    fn decode_body(buf: &[u8]) -> Result<Timerange> {
        if buf.is_empty() {
            return err_at!(ParseError, msg: "empty timerange body");
        }
        match buf[0] {
            STYLE_GRIB1 => {
                let kind_type = buf[1];
                let unit = buf[2];
                let (p1, n) = varint::decode_u64(&buf[3..])?;
                let (p2, _) = varint::decode_u64(&buf[3 + n..])?;
                Ok(Timerange::Grib1 { kind_type, unit, p1: p1 as u32, p2: p2 as u32 })
            }
            STYLE_TIMEDEF => {
                let (step_len, n1) = varint::decode_u64(&buf[1..])?;
                let mut pos = 1 + n1;
                let step_unit = buf[pos];
                pos += 1;
                let stat_type = buf[pos];
                pos += 1;
                let (stat_len, n2) = varint::decode_u64(&buf[pos..])?;
                pos += n2;
                let stat_unit = buf[pos];
                Ok(Timerange::Timedef {
                    step_len: step_len as u32,
                    step_unit,
                    stat_type,
                    stat_len: stat_len as u32,
                    stat_unit,
                })
            }
            other => err_at!(ParseError, msg: "unknown timerange style {}", other),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Timerange::Grib1 { kind_type, unit, p1, p2 } => {
                format!("GRIB1({}, {}, {}, {})", kind_type, unit, p1, p2)
            }
            Timerange::Timedef { step_len, step_unit, stat_type, .. } if *stat_type == STAT_INSTANT => {
                format!("Timedef({}{}, {})", step_len, unit_char(*step_unit), stat_type)
            }
            Timerange::Timedef { step_len, step_unit, stat_type, stat_len, stat_unit } => format!(
                "Timedef({}{}, {}, {}{})",
                step_len,
                unit_char(*step_unit),
                stat_type,
                stat_len,
                unit_char(*stat_unit)
            ),
        }
    }
}

fn unit_char(unit: u8) -> &'static str {
    match unit {
        0 => "m",
        1 => "h",
        2 => "d",
        _ => "?",
    }
}

#[cfg(test)]
#[path = "timerange_test.rs"]
mod timerange_test;
