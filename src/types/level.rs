//! `Level`: the vertical level a message refers to.

use crate::{err_at, types::Codec, util::varint, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Grib1 { kind_type: u8, l1: u16, l2: u16 },
    Grib2S { kind_type: u8, scale: i32, value: i64 },
    Grib2D { kind_type1: u8, scale1: i32, value1: i64, kind_type2: u8, scale2: i32, value2: i64 },
}

const STYLE_GRIB1: u8 = 1;
const STYLE_GRIB2S: u8 = 2;
const STYLE_GRIB2D: u8 = 3;

fn encode_i64(v: i64, out: &mut Vec<u8>) {
    varint::encode_u64(zigzag_encode(v), out);
}

fn decode_i64(buf: &[u8]) -> Result<(i64, usize)> {
    let (raw, n) = varint::decode_u64(buf)?;
    Ok((zigzag_decode(raw), n))
}

fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

impl Codec for Level {
    fn encode_body(&self, out: &mut Vec<u8>) {
        match self {
            Level::Grib1 { kind_type, l1, l2 } => {
                out.push(STYLE_GRIB1);
                out.push(*kind_type);
                varint::encode_u64(*l1 as u64, out);
                varint::encode_u64(*l2 as u64, out);
            }
            Level::Grib2S { kind_type, scale, value } => {
                out.push(STYLE_GRIB2S);
                out.push(*kind_type);
                encode_i64(*scale as i64, out);
                encode_i64(*value, out);
            }
            Level::Grib2D { kind_type1, scale1, value1, kind_type2, scale2, value2 } => {
                out.push(STYLE_GRIB2D);
                out.push(*kind_type1);
                encode_i64(*scale1 as i64, out);
                encode_i64(*value1, out);
                out.push(*kind_type2);
                encode_i64(*scale2 as i64, out);
                encode_i64(*value2, out);
            }
        }
    }

    fn decode_body(buf: &[u8]) -> Result<Level> {
        if buf.is_empty() {
            return err_at!(ParseError, msg: "empty level body");
        }
        let style = buf[0];
        let mut pos = 1;
        match style {
            STYLE_GRIB1 => {
                let kind_type = buf[pos];
                pos += 1;
                let (l1, n) = varint::decode_u64(&buf[pos..])?;
                pos += n;
                let (l2, n) = varint::decode_u64(&buf[pos..])?;
                pos += n;
                if pos != buf.len() {
                    return err_at!(ParseError, msg: "trailing bytes in GRIB1 level body");
                }
                Ok(Level::Grib1 { kind_type, l1: l1 as u16, l2: l2 as u16 })
            }
            STYLE_GRIB2S => {
                let kind_type = buf[pos];
                pos += 1;
                let (scale, n) = decode_i64(&buf[pos..])?;
                pos += n;
                let (value, n) = decode_i64(&buf[pos..])?;
                pos += n;
                if pos != buf.len() {
                    return err_at!(ParseError, msg: "trailing bytes in GRIB2S level body");
                }
                Ok(Level::Grib2S { kind_type, scale: scale as i32, value })
            }
            STYLE_GRIB2D => {
                let kind_type1 = buf[pos];
                pos += 1;
                let (scale1, n) = decode_i64(&buf[pos..])?;
                pos += n;
                let (value1, n) = decode_i64(&buf[pos..])?;
                pos += n;
                let kind_type2 = buf[pos];
                pos += 1;
                let (scale2, n) = decode_i64(&buf[pos..])?;
                pos += n;
                let (value2, n) = decode_i64(&buf[pos..])?;
                pos += n;
                if pos != buf.len() {
                    return err_at!(ParseError, msg: "trailing bytes in GRIB2D level body");
                }
                Ok(Level::Grib2D {
                    kind_type1,
                    scale1: scale1 as i32,
                    value1,
                    kind_type2,
                    scale2: scale2 as i32,
                    value2,
                })
            }
            other => err_at!(ParseError, msg: "unknown level style {}", other),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Level::Grib1 { kind_type, l1, l2 } => format!("GRIB1({}, {}, {})", kind_type, l1, l2),
            Level::Grib2S { kind_type, scale, value } => {
                format!("GRIB2S({}, {}, {})", kind_type, scale, value)
            }
            Level::Grib2D { kind_type1, scale1, value1, kind_type2, scale2, value2 } => format!(
                "GRIB2D({}, {}, {}, {}, {}, {})",
                kind_type1, scale1, value1, kind_type2, scale2, value2
            ),
        }
    }
}

#[cfg(test)]
#[path = "level_test.rs"]
mod level_test;
