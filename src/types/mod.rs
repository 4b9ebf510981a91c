//! Metadata item kinds and the `ItemSet` they assemble into (§3, §4.1).
//!
//! Each kind is a sum type over "styles" (e.g. an `Origin` can be a GRIB1,
//! GRIB2 or BUFR origin), encoded on disk as
//! `<kind_varint><length_varint><body>` (see [`codec`]). `ItemSet` holds at
//! most one item per kind, indexed by [`KindCode`], and orders itself
//! lexicographically over a fixed scan order.

pub mod codec;

pub mod area;
pub mod assigned_dataset;
pub mod bbox;
pub mod ensemble;
pub mod level;
pub mod note;
pub mod origin;
pub mod proddef;
pub mod product;
pub mod quantity;
pub mod reftime;
pub mod run;
pub mod source;
pub mod task;
pub mod timerange;
pub mod value;

pub use area::Area;
pub use assigned_dataset::AssignedDataset;
pub use bbox::BBox;
pub use ensemble::Ensemble;
pub use level::Level;
pub use note::Note;
pub use origin::Origin;
pub use proddef::Proddef;
pub use product::Product;
pub use quantity::Quantity;
pub use reftime::Reftime;
pub use run::Run;
pub use source::Source;
pub use task::Task;
pub use timerange::Timerange;
pub use value::Value;

use crate::{err_at, Result};

/// Stable numeric code for a metadata kind; also its on-disk envelope tag
/// and its `ItemSet` storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(usize)]
pub enum KindCode {
    Origin = 0,
    Product = 1,
    Level = 2,
    Timerange = 3,
    Area = 4,
    Proddef = 5,
    BBox = 6,
    Run = 7,
    Quantity = 8,
    Task = 9,
    Reftime = 10,
    Value = 11,
    Source = 12,
    Note = 13,
    AssignedDataset = 14,
    Ensemble = 15,
}

/// `ItemSet` comparisons walk kinds in this order (§4.1's "fixed scan
/// order"); kinds not listed here (reftime, value, source, note,
/// assigned_dataset, ensemble) carry no ordering weight of their own and
/// are compared only incidentally via `NUM_KINDS`-wide iteration below.
pub const SCAN_ORDER: [KindCode; 10] = [
    KindCode::Origin,
    KindCode::Product,
    KindCode::Level,
    KindCode::Timerange,
    KindCode::Area,
    KindCode::Proddef,
    KindCode::BBox,
    KindCode::Run,
    KindCode::Quantity,
    KindCode::Task,
];

pub const NUM_KINDS: usize = 16;

impl KindCode {
    pub fn from_usize(val: usize) -> Result<KindCode> {
        use KindCode::*;
        Ok(match val {
            0 => Origin,
            1 => Product,
            2 => Level,
            3 => Timerange,
            4 => Area,
            5 => Proddef,
            6 => BBox,
            7 => Run,
            8 => Quantity,
            9 => Task,
            10 => Reftime,
            11 => Value,
            12 => Source,
            13 => Note,
            14 => AssignedDataset,
            15 => Ensemble,
            _ => return err_at!(ParseError, msg: "unknown kind code {}", val),
        })
    }

    pub fn name(&self) -> &'static str {
        use KindCode::*;
        match self {
            Origin => "origin",
            Product => "product",
            Level => "level",
            Timerange => "timerange",
            Area => "area",
            Proddef => "proddef",
            BBox => "bbox",
            Run => "run",
            Quantity => "quantity",
            Task => "task",
            Reftime => "reftime",
            Value => "value",
            Source => "source",
            Note => "note",
            AssignedDataset => "assigneddataset",
            Ensemble => "ensemble",
        }
    }

    pub fn from_name(name: &str) -> Result<KindCode> {
        use KindCode::*;
        Ok(match name {
            "origin" => Origin,
            "product" => Product,
            "level" => Level,
            "timerange" => Timerange,
            "area" => Area,
            "proddef" => Proddef,
            "bbox" => BBox,
            "run" => Run,
            "quantity" => Quantity,
            "task" => Task,
            "reftime" => Reftime,
            "value" => Value,
            "source" => Source,
            "note" => Note,
            "assigneddataset" => AssignedDataset,
            "ensemble" => Ensemble,
            other => return err_at!(ParseError, msg: "unknown kind name {:?}", other),
        })
    }
}

/// A decoded metadata item, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Item {
    Origin(Origin),
    Product(Product),
    Level(Level),
    Timerange(Timerange),
    Area(Area),
    Proddef(Proddef),
    BBox(BBox),
    Run(Run),
    Quantity(Quantity),
    Task(Task),
    Reftime(Reftime),
    Value(Value),
    Source(Source),
    Note(Note),
    AssignedDataset(AssignedDataset),
    Ensemble(Ensemble),
}

impl Item {
    pub fn kind(&self) -> KindCode {
        use Item::*;
        match self {
            Origin(_) => KindCode::Origin,
            Product(_) => KindCode::Product,
            Level(_) => KindCode::Level,
            Timerange(_) => KindCode::Timerange,
            Area(_) => KindCode::Area,
            Proddef(_) => KindCode::Proddef,
            BBox(_) => KindCode::BBox,
            Run(_) => KindCode::Run,
            Quantity(_) => KindCode::Quantity,
            Task(_) => KindCode::Task,
            Reftime(_) => KindCode::Reftime,
            Value(_) => KindCode::Value,
            Source(_) => KindCode::Source,
            Note(_) => KindCode::Note,
            AssignedDataset(_) => KindCode::AssignedDataset,
            Ensemble(_) => KindCode::Ensemble,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        use Item::*;
        let mut body = vec![];
        match self {
            Origin(v) => v.encode_body(&mut body),
            Product(v) => v.encode_body(&mut body),
            Level(v) => v.encode_body(&mut body),
            Timerange(v) => v.encode_body(&mut body),
            Area(v) => v.encode_body(&mut body),
            Proddef(v) => v.encode_body(&mut body),
            BBox(v) => v.encode_body(&mut body),
            Run(v) => v.encode_body(&mut body),
            Quantity(v) => v.encode_body(&mut body),
            Task(v) => v.encode_body(&mut body),
            Reftime(v) => v.encode_body(&mut body),
            Value(v) => v.encode_body(&mut body),
            Source(v) => v.encode_body(&mut body),
            Note(v) => v.encode_body(&mut body),
            AssignedDataset(v) => v.encode_body(&mut body),
            Ensemble(v) => v.encode_body(&mut body),
        }
        let mut out = vec![];
        codec::encode_envelope(self.kind(), &body, &mut out);
        out
    }

    /// Decode one item envelope from the front of `buf`.
    pub fn decode(buf: &[u8]) -> Result<(Item, usize)> {
        let (kind, body, n) = codec::decode_envelope(buf)?;
        let item = match kind {
            KindCode::Origin => Item::Origin(Origin::decode_body(body)?),
            KindCode::Product => Item::Product(Product::decode_body(body)?),
            KindCode::Level => Item::Level(Level::decode_body(body)?),
            KindCode::Timerange => Item::Timerange(Timerange::decode_body(body)?),
            KindCode::Area => Item::Area(Area::decode_body(body)?),
            KindCode::Proddef => Item::Proddef(Proddef::decode_body(body)?),
            KindCode::BBox => Item::BBox(BBox::decode_body(body)?),
            KindCode::Run => Item::Run(Run::decode_body(body)?),
            KindCode::Quantity => Item::Quantity(Quantity::decode_body(body)?),
            KindCode::Task => Item::Task(Task::decode_body(body)?),
            KindCode::Reftime => Item::Reftime(Reftime::decode_body(body)?),
            KindCode::Value => Item::Value(Value::decode_body(body)?),
            KindCode::Source => Item::Source(Source::decode_body(body)?),
            KindCode::Note => Item::Note(Note::decode_body(body)?),
            KindCode::AssignedDataset => Item::AssignedDataset(AssignedDataset::decode_body(body)?),
            KindCode::Ensemble => Item::Ensemble(Ensemble::decode_body(body)?),
        };
        Ok((item, n))
    }

    /// Canonical textual form, e.g. `GRIB1(200, 98, 1)` or `2021-01-01T00:00:00Z`.
    pub fn to_text(&self) -> String {
        use Item::*;
        match self {
            Origin(v) => v.to_text(),
            Product(v) => v.to_text(),
            Level(v) => v.to_text(),
            Timerange(v) => v.to_text(),
            Area(v) => v.to_text(),
            Proddef(v) => v.to_text(),
            BBox(v) => v.to_text(),
            Run(v) => v.to_text(),
            Quantity(v) => v.to_text(),
            Task(v) => v.to_text(),
            Reftime(v) => v.to_text(),
            Value(v) => v.to_text(),
            Source(v) => v.to_text(),
            Note(v) => v.to_text(),
            AssignedDataset(v) => v.to_text(),
            Ensemble(v) => v.to_text(),
        }
    }
}

/// A trait every kind's value type implements, used uniformly by
/// [`Item::encode`]/[`Item::decode`] and the matcher.
pub trait Codec: Sized {
    fn encode_body(&self, out: &mut Vec<u8>);
    fn decode_body(buf: &[u8]) -> Result<Self>;
    fn to_text(&self) -> String;
}

/// At most one item per kind (§4.1's "ItemSet invariants"). Comparisons
/// walk [`SCAN_ORDER`] first, then the remaining kinds in `KindCode` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSet {
    slots: [Option<Item>; NUM_KINDS],
}

impl ItemSet {
    pub fn new() -> ItemSet {
        ItemSet::default()
    }

    pub fn set(&mut self, item: Item) {
        self.slots[item.kind() as usize] = Some(item);
    }

    pub fn get(&self, kind: KindCode) -> Option<&Item> {
        self.slots[kind as usize].as_ref()
    }

    pub fn remove(&mut self, kind: KindCode) -> Option<Item> {
        self.slots[kind as usize].take()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Encode as a sequence of envelopes in `KindCode` order (stable,
    /// independent of insertion order).
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![];
        for item in self.iter() {
            out.extend_from_slice(&item.encode());
        }
        out
    }

    pub fn decode(mut buf: &[u8]) -> Result<ItemSet> {
        let mut set = ItemSet::new();
        while !buf.is_empty() {
            let (item, n) = Item::decode(buf)?;
            set.set(item);
            buf = &buf[n..];
        }
        Ok(set)
    }

    /// Project down to a subset of kinds, used by [`crate::summary`] rows.
    pub fn project(&self, kinds: &[KindCode]) -> ItemSet {
        let mut out = ItemSet::new();
        for &k in kinds {
            if let Some(item) = self.get(k) {
                out.set(item.clone());
            }
        }
        out
    }
}

impl PartialOrd for ItemSet {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ItemSet {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        for &kind in SCAN_ORDER.iter() {
            match self.get(kind).cmp(&other.get(kind)) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        for idx in 0..NUM_KINDS {
            if SCAN_ORDER.iter().any(|k| *k as usize == idx) {
                continue;
            }
            match self.slots[idx].cmp(&other.slots[idx]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
