//! `Product`: the variable a message carries, one style per source format.

use crate::{err_at, types::Codec, util::varint, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Product {
    Grib1 { origin: u8, table: u8, product: u8 },
    Grib2 { centre: u16, discipline: u8, category: u8, number: u8 },
    Bufr { kind_type: u8, subtype: u8, localsubtype: u8 },
}

const STYLE_GRIB1: u8 = 1;
const STYLE_GRIB2: u8 = 2;
const STYLE_BUFR: u8 = 3;

impl Codec for Product {
    fn encode_body(&self, out: &mut Vec<u8>) {
        match self {
            Product::Grib1 { origin, table, product } => {
                out.push(STYLE_GRIB1);
                out.extend_from_slice(&[*origin, *table, *product]);
            }
            Product::Grib2 { centre, discipline, category, number } => {
                out.push(STYLE_GRIB2);
                varint::encode_u64(*centre as u64, out);
                out.extend_from_slice(&[*discipline, *category, *number]);
            }
            Product::Bufr { kind_type, subtype, localsubtype } => {
                out.push(STYLE_BUFR);
                out.extend_from_slice(&[*kind_type, *subtype, *localsubtype]);
            }
        }
    }

    fn decode_body(buf: &[u8]) -> Result<Product> {
        if buf.is_empty() {
            return err_at!(ParseError, msg: "empty product body");
        }
        match buf[0] {
            STYLE_GRIB1 if buf.len() == 4 => {
                Ok(Product::Grib1 { origin: buf[1], table: buf[2], product: buf[3] })
            }
            STYLE_GRIB2 => {
                let (centre, n) = varint::decode_u64(&buf[1..])?;
                let rest = &buf[1 + n..];
                if rest.len() != 3 {
                    return err_at!(ParseError, msg: "malformed GRIB2 product body");
                }
                Ok(Product::Grib2 {
                    centre: centre as u16,
                    discipline: rest[0],
                    category: rest[1],
                    number: rest[2],
                })
            }
            STYLE_BUFR if buf.len() == 4 => Ok(Product::Bufr {
                kind_type: buf[1],
                subtype: buf[2],
                localsubtype: buf[3],
            }),
            other => err_at!(ParseError, msg: "unknown product style {}", other),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Product::Grib1 { origin, table, product } => {
                format!("GRIB1({}, {}, {})", origin, table, product)
            }
            Product::Grib2 { centre, discipline, category, number } => {
                format!("GRIB2({}, {}, {}, {})", centre, discipline, category, number)
            }
            Product::Bufr { kind_type, subtype, localsubtype } => {
                format!("BUFR({}, {}, {})", kind_type, subtype, localsubtype)
            }
        }
    }
}

#[cfg(test)]
#[path = "product_test.rs"]
mod product_test;
