//! `Area`: geographic coverage, encoded as a GRIB-style value bag
//! (`original_source/arki/types/area.cc`).

use crate::{
    types::{
        value::{decode_value_map, encode_value_map, value_map_to_text, ValueMap},
        Codec,
    },
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Area {
    pub values: ValueMap,
}

impl Codec for Area {
    fn encode_body(&self, out: &mut Vec<u8>) {
        encode_value_map(&self.values, out);
    }

    fn decode_body(buf: &[u8]) -> Result<Area> {
        Ok(Area { values: decode_value_map(buf)? })
    }

    fn to_text(&self) -> String {
        format!("GRIB({})", value_map_to_text(&self.values))
    }
}

#[cfg(test)]
#[path = "area_test.rs"]
mod area_test;
