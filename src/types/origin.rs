//! `Origin`: which centre produced a message, in one of three styles
//! (§3, `original_source/arki/types.cc`'s style-tagged encoding).

use crate::{err_at, types::Codec, util::varint, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    Grib1 { centre: u8, subcentre: u8, process: u8 },
    Grib2 {
        centre: u16,
        subcentre: u16,
        process_type: u8,
        bg_process: u8,
        process: u8,
    },
    Bufr { centre: u8, subcentre: u8 },
}

const STYLE_GRIB1: u8 = 1;
const STYLE_GRIB2: u8 = 2;
const STYLE_BUFR: u8 = 3;

impl Codec for Origin {
    fn encode_body(&self, out: &mut Vec<u8>) {
        match self {
            Origin::Grib1 { centre, subcentre, process } => {
                out.push(STYLE_GRIB1);
                out.extend_from_slice(&[*centre, *subcentre, *process]);
            }
            Origin::Grib2 { centre, subcentre, process_type, bg_process, process } => {
                out.push(STYLE_GRIB2);
                varint::encode_u64(*centre as u64, out);
                varint::encode_u64(*subcentre as u64, out);
                out.extend_from_slice(&[*process_type, *bg_process, *process]);
            }
            Origin::Bufr { centre, subcentre } => {
                out.push(STYLE_BUFR);
                out.extend_from_slice(&[*centre, *subcentre]);
            }
        }
    }

    fn decode_body(buf: &[u8]) -> Result<Origin> {
        if buf.is_empty() {
            return err_at!(ParseError, msg: "empty origin body");
        }
        match buf[0] {
            STYLE_GRIB1 if buf.len() == 4 => Ok(Origin::Grib1 {
                centre: buf[1],
                subcentre: buf[2],
                process: buf[3],
            }),
            STYLE_GRIB2 => {
                let (centre, n1) = varint::decode_u64(&buf[1..])?;
                let (subcentre, n2) = varint::decode_u64(&buf[1 + n1..])?;
                let rest = &buf[1 + n1 + n2..];
                if rest.len() != 3 {
                    return err_at!(ParseError, msg: "malformed GRIB2 origin body");
                }
                Ok(Origin::Grib2 {
                    centre: centre as u16,
                    subcentre: subcentre as u16,
                    process_type: rest[0],
                    bg_process: rest[1],
                    process: rest[2],
                })
            }
            STYLE_BUFR if buf.len() == 3 => Ok(Origin::Bufr { centre: buf[1], subcentre: buf[2] }),
            other => err_at!(ParseError, msg: "unknown origin style {}", other),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Origin::Grib1 { centre, subcentre, process } => {
                format!("GRIB1({}, {}, {})", centre, subcentre, process)
            }
            Origin::Grib2 { centre, subcentre, process_type, bg_process, process } => format!(
                "GRIB2({}, {}, {}, {}, {})",
                centre, subcentre, process_type, bg_process, process
            ),
            Origin::Bufr { centre, subcentre } => format!("BUFR({}, {})", centre, subcentre),
        }
    }
}

#[cfg(test)]
#[path = "origin_test.rs"]
mod origin_test;
