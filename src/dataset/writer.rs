//! Dataset writer: one writer lock per dataset (§5), a segment per
//! calendar month, and an index insert per message (§4.8's acquire modes).

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    cache::SummaryCache,
    dataset::config::{Config, IndexFlavour, Step},
    err_at,
    index::sqlite::{InsertOutcome, OnConflict, SqliteIndex},
    segment::{self, Segment},
    types::{assigned_dataset::AssignedDataset, source::Source, Item, ItemSet, KindCode, Reftime},
    util::lock::WriterLock,
    Result,
};

/// Acquire modes, in the original's naming (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireMode {
    /// Reject an incoming message whose unique key already exists.
    Default,
    /// Always overwrite the existing message.
    ReplaceAlways,
    /// Overwrite only if the incoming message's `usn` value annotation is
    /// higher than the existing one's (missing `usn` counts as 0).
    ReplaceHigherUsn,
    /// Silently keep the existing message, dropping the incoming one.
    ReplaceNever,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    Ok,
    Duplicate,
    NotWritten,
}

pub struct Writer {
    config: Config,
    _lock: WriterLock,
    index: SqliteIndex,
    cache: SummaryCache,
    segments: HashMap<String, Box<dyn Segment>>,
}

fn usn_of(set: &ItemSet) -> i64 {
    match set.get(KindCode::Value) {
        Some(Item::Value(v)) if v.key == "usn" => v.value.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Map a reftime to a segment path under `dataset_path`, per §6's
/// per-step naming table. Every step nests under a `YYYY/` directory;
/// `Singlefile` additionally probes for the next free counter since its
/// name isn't determined by the reftime alone.
fn segment_name(step: Step, reftime: &Reftime, extension: &str, dataset_path: &Path) -> String {
    use chrono::{Datelike, Timelike};
    let t = reftime.begin();
    let year = t.year();
    match step {
        Step::Yearly => format!("{:04}/{:04}.{}", year, year, extension),
        Step::Monthly => format!("{:04}/{:02}.{}", year, t.month(), extension),
        Step::Biweekly => {
            let half = if t.day() <= 15 { "a" } else { "b" };
            format!("{:04}/{:02}-{}.{}", year, t.month(), half, extension)
        }
        Step::Weekly => {
            let week = (t.day() - 1) / 7 + 1;
            format!("{:04}/{:02}-{}.{}", year, t.month(), week, extension)
        }
        Step::Daily => format!("{:04}/{:02}-{:02}.{}", year, t.month(), t.day(), extension),
        Step::Singlefile => {
            let prefix = format!("{:04}/{:02}-{:02}.{:02}{:02}{:02}", year, t.month(), t.day(), t.hour(), t.minute(), t.second());
            let mut n = 0u32;
            loop {
                let name = format!("{}.{:04}.{}", prefix, n, extension);
                if !dataset_path.join(&name).exists() {
                    return name;
                }
                n += 1;
            }
        }
    }
}

fn extension_for(flavour: segment::Flavour) -> &'static str {
    match flavour {
        segment::Flavour::Concat => "concat",
        segment::Flavour::Line => "vm2",
        segment::Flavour::Dir => "dir",
        segment::Flavour::Gz => "gz",
    }
}

impl Writer {
    pub fn open(config: Config) -> Result<Writer> {
        err_at!(IOError, std::fs::create_dir_all(&config.path))?;
        let lock = WriterLock::acquire(&config.path.join(".writer.lock"))?;
        let index = SqliteIndex::open(&config.path.join("index.sqlite"), config.index.clone(), config.unique.clone())?;
        let cache = SummaryCache::open(&config.path.join(".cache"))?;
        Ok(Writer { config, _lock: lock, index, cache, segments: HashMap::new() })
    }

    fn segment_path(&self, name: &str) -> PathBuf {
        self.config.path.join(name)
    }

    fn open_segment(&mut self, name: &str) -> Result<&mut Box<dyn Segment>> {
        if !self.segments.contains_key(name) {
            let seg = segment::open(self.config.segment_flavour, &self.segment_path(name))?;
            self.segments.insert(name.to_string(), seg);
        }
        Ok(self.segments.get_mut(name).unwrap())
    }

    /// Does this dataset's own `filter` (if any) accept `set`? Used by the
    /// writer itself and by the dispatcher to decide routing (§4.8).
    pub fn accepts(&self, set: &ItemSet) -> Result<bool> {
        match self.config.matcher(&crate::matcher::alias::AliasDb::new())? {
            Some(matcher) => Ok(matcher.matches(set)),
            None => Ok(true),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Acquire one message into the dataset (§4.8). `aliases` resolves the
    /// dataset's own `filter` restriction, if configured.
    pub fn acquire(&mut self, payload: &[u8], set: &ItemSet, mode: AcquireMode) -> Result<AcquireOutcome> {
        if !self.accepts(set)? {
            return Ok(AcquireOutcome::NotWritten);
        }

        let reftime = match set.get(KindCode::Reftime) {
            Some(Item::Reftime(rt)) => *rt,
            _ => return err_at!(InvalidInput, msg: "message has no reftime"),
        };

        // Decide before touching the segment: a message rejected or skipped
        // as a duplicate must not grow any file on disk (§4.8).
        let key = crate::index::unique_key(set, &self.config.unique);
        let should_write = match mode {
            AcquireMode::ReplaceAlways => true,
            AcquireMode::Default | AcquireMode::ReplaceNever => !self.index.exists_for_unique(set)?,
            AcquireMode::ReplaceHigherUsn => {
                let existing_usn = self
                    .index
                    .query(&crate::index::DataQuery::all())?
                    .into_iter()
                    .find(|e| crate::index::unique_key(&e.metadata, &self.config.unique) == key)
                    .map(|e| usn_of(&e.metadata));
                match existing_usn {
                    None => true,
                    Some(existing) => usn_of(set) > existing,
                }
            }
        };
        if !should_write {
            return Ok(AcquireOutcome::Duplicate);
        }

        let name = segment_name(self.config.step, &reftime, extension_for(self.config.segment_flavour), &self.config.path);
        let (offset, size) = self.open_segment(&name)?.append(payload)?;

        let format = extension_for(self.config.segment_flavour).to_string();
        let basedir = self.config.path.to_string_lossy().to_string();
        let local_id = format!("{}:{}", name, offset);
        let mut stamped = set.clone();
        stamped.set(Item::Source(Source::Blob { format, basedir, filename: name.clone(), offset, size }));
        stamped.set(Item::AssignedDataset(AssignedDataset { name: self.config.name.clone(), id: local_id }));

        // `should_write` already settled the reject/skip decision above, so
        // any remaining conflict here is the row we just decided to replace.
        let outcome = self.index.insert(&name, offset, size, &stamped, OnConflict::Replace);
        let (year, month) = {
            use chrono::Datelike;
            let t = reftime.begin();
            (t.year(), t.month())
        };

        match outcome {
            Ok(InsertOutcome::Inserted) | Ok(InsertOutcome::Replaced) => {
                self.invalidate_month(year, month)?;
                Ok(AcquireOutcome::Ok)
            }
            Ok(InsertOutcome::Skipped) => Ok(AcquireOutcome::Duplicate),
            Err(crate::Error::DuplicateError(_, _)) => Ok(AcquireOutcome::Duplicate),
            Err(e) => Err(e),
        }
    }

    fn invalidate_month(&self, year: i32, month: u32) -> Result<()> {
        self.cache.invalidate_month(year, month)
    }

    pub fn index_flavour(&self) -> IndexFlavour {
        self.config.index_flavour
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod writer_test;
