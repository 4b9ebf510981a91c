//! Dataset reader: resolves an index query into metadata/payload pairs,
//! reopening segments read-only and caching them for the life of the
//! reader (§4.7).

use std::{collections::HashMap, path::PathBuf};

use crate::{
    cache::SummaryCache,
    dataset::config::Config,
    index::{sqlite::SqliteIndex, DataQuery, IndexEntry},
    matcher::Matcher,
    segment::{self, Segment},
    summary::Summary,
    types::{ItemSet, KindCode},
    Result,
};

pub struct Reader {
    config: Config,
    index: SqliteIndex,
    cache: SummaryCache,
    segments: HashMap<String, Box<dyn Segment>>,
}

impl Reader {
    pub fn open(config: Config) -> Result<Reader> {
        let index = SqliteIndex::open(&config.path.join("index.sqlite"), config.index.clone(), config.unique.clone())?;
        let cache = SummaryCache::open(&config.path.join(".cache"))?;
        Ok(Reader { config, index, cache, segments: HashMap::new() })
    }

    fn segment_path(&self, name: &str) -> PathBuf {
        self.config.path.join(name)
    }

    fn open_segment(&mut self, name: &str) -> Result<&Box<dyn Segment>> {
        if !self.segments.contains_key(name) {
            let seg = segment::open(self.config.segment_flavour, &self.segment_path(name))?;
            self.segments.insert(name.to_string(), seg);
        }
        Ok(self.segments.get(name).unwrap())
    }

    /// Run `query` and return every matching message's metadata and bytes.
    pub fn query(&mut self, query: &DataQuery) -> Result<Vec<(ItemSet, Vec<u8>)>> {
        let entries = self.index.query(query)?;
        let mut out = Vec::with_capacity(entries.len());
        for IndexEntry { segment, offset, size, metadata } in entries {
            let bytes = self.open_segment(&segment)?.read(offset, size)?;
            out.push((metadata, bytes));
        }
        Ok(out)
    }

    /// Run `query` but only the metadata, skipping segment reads
    /// (`--metadata`/`--summary` style output, §4.11).
    pub fn query_metadata(&self, query: &DataQuery) -> Result<Vec<ItemSet>> {
        Ok(self.index.query(query)?.into_iter().map(|e| e.metadata).collect())
    }

    /// Roll up every message matching `matcher` into a single [`Summary`]
    /// (§4.5's `query_summary`). An unrestricted query is served from the
    /// per-month cache (§4.6), rebuilding any month that isn't cached yet;
    /// a restricted one is recomputed directly, since the cache is keyed
    /// by calendar month and an arbitrary matcher doesn't line up with
    /// that grain.
    pub fn query_summary(&mut self, matcher: Option<&Matcher>) -> Result<Summary> {
        match matcher {
            None => {
                if let Some(cached) = self.cache.get_all()? {
                    return Ok(cached);
                }
                self.rebuild_month_caches()?;
                self.cache.rebuild_all()
            }
            Some(m) => {
                let rows = self.query_metadata(&DataQuery::matching(m.clone()))?;
                let mut summary = Summary::new();
                for set in &rows {
                    summary.add(set, payload_size(set));
                }
                Ok(summary)
            }
        }
    }

    /// Fill in the cache for every calendar month that has data and isn't
    /// cached yet, by grouping a single full-index scan by reftime month.
    fn rebuild_month_caches(&mut self) -> Result<()> {
        use chrono::Datelike;
        use std::collections::HashMap as Map;

        let entries = self.index.query(&DataQuery::all())?;
        let mut by_month: Map<(i32, u32), Summary> = Map::new();
        for IndexEntry { metadata, .. } in &entries {
            if let Some(crate::types::Item::Reftime(rt)) = metadata.get(KindCode::Reftime) {
                let t = rt.begin();
                by_month.entry((t.year(), t.month())).or_insert_with(Summary::new).add(metadata, payload_size(metadata));
            }
        }
        for ((year, month), summary) in by_month {
            if self.cache.get_month(year, month)?.is_none() {
                self.cache.put_month(year, month, &summary)?;
            }
        }
        Ok(())
    }
}

fn payload_size(set: &ItemSet) -> u64 {
    match set.get(KindCode::Source) {
        Some(crate::types::Item::Source(crate::types::source::Source::Blob { size, .. })) => *size,
        Some(crate::types::Item::Source(crate::types::source::Source::Inline { size, .. })) => *size,
        _ => 0,
    }
}

#[cfg(test)]
#[path = "reader_test.rs"]
mod reader_test;
