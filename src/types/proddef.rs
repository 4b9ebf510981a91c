//! `Proddef`: extra product-defining attributes beyond `Product`, also a
//! value bag (`original_source/arki/types/proddef.cc`).

use crate::{
    types::{
        value::{decode_value_map, encode_value_map, value_map_to_text, ValueMap},
        Codec,
    },
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Proddef {
    pub values: ValueMap,
}

impl Codec for Proddef {
    fn encode_body(&self, out: &mut Vec<u8>) {
        encode_value_map(&self.values, out);
    }

    fn decode_body(buf: &[u8]) -> Result<Proddef> {
        Ok(Proddef { values: decode_value_map(buf)? })
    }

    fn to_text(&self) -> String {
        format!("GRIB({})", value_map_to_text(&self.values))
    }
}

#[cfg(test)]
#[path = "proddef_test.rs"]
mod proddef_test;
