//! `Ensemble`: ensemble-forecast membership (supplemented from
//! `original_source/arki/types/ensemble.cc`, dropped by the distilled spec
//! but retained here as an ambient value-bag kind alongside `Area`/`Proddef`).

use crate::{
    types::{
        value::{decode_value_map, encode_value_map, value_map_to_text, ValueMap},
        Codec,
    },
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ensemble {
    pub values: ValueMap,
}

impl Codec for Ensemble {
    fn encode_body(&self, out: &mut Vec<u8>) {
        encode_value_map(&self.values, out);
    }

    fn decode_body(buf: &[u8]) -> Result<Ensemble> {
        Ok(Ensemble { values: decode_value_map(buf)? })
    }

    fn to_text(&self) -> String {
        format!("GRIB({})", value_map_to_text(&self.values))
    }
}

#[cfg(test)]
#[path = "ensemble_test.rs"]
mod ensemble_test;
