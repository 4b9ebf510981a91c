//! Coarse per-dataset statistics (§4.3): a `Summary` is a set of rows, each
//! a partial `ItemSet` (everything but reftime/source/note/value/assigned
//! dataset) paired with `Stats` covering every message that shares it.
//! Summaries merge, filter by matcher, and encode with an intern table so
//! repeated items across rows cost one reference instead of a full copy.

use std::cmp::{max, min};

use chrono::NaiveDateTime;

use crate::{
    err_at,
    matcher::Matcher,
    types::{codec, Item, ItemSet, KindCode},
    util::varint,
    Result,
};

/// Kinds that make up a summary row's key. Reftime is folded into `Stats`
/// instead, since coalescing every distinct instant into its own row would
/// defeat the point of summarizing.
pub const SUMMARY_KINDS: [KindCode; 11] = [
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
    KindCode::Ensemble,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub count: u64,
    pub size: u64,
    pub reftime: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Stats {
    pub fn one(size: u64, reftime: Option<(NaiveDateTime, NaiveDateTime)>) -> Stats {
        Stats { count: 1, size, reftime }
    }

    pub fn merge(&mut self, other: &Stats) {
        self.count += other.count;
        self.size += other.size;
        self.reftime = match (self.reftime, other.reftime) {
            (None, x) => x,
            (x, None) => x,
            (Some((b1, e1)), Some((b2, e2))) => Some((min(b1, b2), max(e1, e2))),
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct Summary {
    rows: Vec<(ItemSet, Stats)>,
}

impl Summary {
    pub fn new() -> Summary {
        Summary::default()
    }

    pub fn rows(&self) -> &[(ItemSet, Stats)] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.rows.iter().map(|(_, s)| s.count).sum()
    }

    pub fn total_size(&self) -> u64 {
        self.rows.iter().map(|(_, s)| s.size).sum()
    }

    /// Add one message's contribution, merging into an existing row with
    /// an identical key when one exists.
    pub fn add(&mut self, set: &ItemSet, size: u64) {
        let key = set.project(&SUMMARY_KINDS);
        let reftime = match set.get(KindCode::Reftime) {
            Some(Item::Reftime(rt)) => Some((rt.begin(), rt.end())),
            _ => None,
        };
        let stats = Stats::one(size, reftime);
        match self.rows.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.merge(&stats),
            None => self.rows.push((key, stats)),
        }
    }

    /// Merge `other`'s rows into `self` in place (used when combining a
    /// segment summary into its dataset-level summary, §4.6).
    pub fn merge(&mut self, other: &Summary) {
        for (key, stats) in &other.rows {
            match self.rows.iter_mut().find(|(k, _)| k == key) {
                Some((_, existing)) => existing.merge(stats),
                None => self.rows.push((key.clone(), stats.clone())),
            }
        }
    }

    /// Rows whose key could plausibly satisfy `matcher`: a row's reftime
    /// range is folded back in as a synthetic `Reftime::Period` so a
    /// reftime clause can still prune rows.
    pub fn filter(&self, matcher: &Matcher) -> Summary {
        let rows = self
            .rows
            .iter()
            .filter(|(key, stats)| {
                let mut probe = key.clone();
                if let Some((begin, end)) = stats.reftime {
                    probe.set(Item::Reftime(crate::types::Reftime::Period(begin, end)));
                }
                matcher.matches(&probe)
            })
            .cloned()
            .collect();
        Summary { rows }
    }

    /// Encode with an intern table: every distinct item across every row
    /// is written once, then each row references its items by table index.
    pub fn encode(&self) -> Vec<u8> {
        let mut table: Vec<Item> = vec![];
        let mut index_of = |item: &Item, table: &mut Vec<Item>| -> usize {
            match table.iter().position(|t| t == item) {
                Some(i) => i,
                None => {
                    table.push(item.clone());
                    table.len() - 1
                }
            }
        };

        let mut row_refs: Vec<(Vec<usize>, &Stats)> = vec![];
        for (key, stats) in &self.rows {
            let refs = key.iter().map(|item| index_of(item, &mut table)).collect();
            row_refs.push((refs, stats));
        }

        let mut body = vec![];
        varint::encode_usize(table.len(), &mut body);
        for item in &table {
            body.extend_from_slice(&item.encode());
        }
        varint::encode_usize(row_refs.len(), &mut body);
        for (refs, stats) in row_refs {
            varint::encode_usize(refs.len(), &mut body);
            for idx in refs {
                varint::encode_usize(idx, &mut body);
            }
            varint::encode_u64(stats.count, &mut body);
            varint::encode_u64(stats.size, &mut body);
            match stats.reftime {
                Some((begin, end)) => {
                    body.push(1);
                    body.extend_from_slice(&begin.and_utc().timestamp().to_be_bytes());
                    body.extend_from_slice(&end.and_utc().timestamp().to_be_bytes());
                }
                None => body.push(0),
            }
        }

        let mut out = vec![];
        codec::encode_bundle(codec::BUNDLE_SUMMARY_ITEM, &body, &mut out);
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Summary> {
        let (_, _, body, _) = codec::decode_bundle(buf)?;
        let (table_len, mut pos) = varint::decode_usize(body)?;
        let mut table = Vec::with_capacity(table_len);
        for _ in 0..table_len {
            let (item, n) = Item::decode(&body[pos..])?;
            pos += n;
            table.push(item);
        }
        let (row_count, n) = varint::decode_usize(&body[pos..])?;
        pos += n;
        let mut rows = Vec::with_capacity(row_count);
        for _ in 0..row_count {
            let (ref_count, n) = varint::decode_usize(&body[pos..])?;
            pos += n;
            let mut key = ItemSet::new();
            for _ in 0..ref_count {
                let (idx, n) = varint::decode_usize(&body[pos..])?;
                pos += n;
                let item = table
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| crate::Error::ParseError("summary".into(), format!("bad intern index {}", idx)))?;
                key.set(item);
            }
            let (count, n) = varint::decode_u64(&body[pos..])?;
            pos += n;
            let (size, n) = varint::decode_u64(&body[pos..])?;
            pos += n;
            let has_reftime = body[pos];
            pos += 1;
            let reftime = if has_reftime == 1 {
                let begin = decode_timestamp(&body[pos..pos + 8])?;
                pos += 8;
                let end = decode_timestamp(&body[pos..pos + 8])?;
                pos += 8;
                Some((begin, end))
            } else {
                None
            };
            rows.push((key, Stats { count, size, reftime }));
        }
        Ok(Summary { rows })
    }
}

fn decode_timestamp(buf: &[u8]) -> Result<NaiveDateTime> {
    use chrono::{TimeZone, Utc};
    if buf.len() != 8 {
        return err_at!(ParseError, msg: "malformed summary timestamp");
    }
    let secs = i64::from_be_bytes(buf.try_into().unwrap());
    Ok(Utc.timestamp_opt(secs, 0).single().unwrap().naive_utc())
}
