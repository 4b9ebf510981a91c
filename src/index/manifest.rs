//! The `manifest`/`simple` flavour: no per-message index, just a per-segment
//! `Summary` roll-up, plus an optional sqlite mirror (`force_sqlite`) for
//! datasets large enough that scanning every segment summary at query time
//! gets expensive.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::{err_at, matcher::Matcher, summary::Summary, util, Error, Result};

#[derive(Debug, Clone)]
struct Entry {
    segment: String,
    mtime: i64,
    summary: Summary,
}

/// Holds segment-level summaries. The text form is a sequence of
/// `segment\tmtime\t<len><bundle>` lines; `force_sqlite` additionally (or
/// instead) keeps the same rows in a small sqlite table for fast
/// `segments_matching` lookups on large datasets.
pub struct ManifestIndex {
    path: PathBuf,
    entries: Vec<Entry>,
    sqlite: Option<Connection>,
}

impl ManifestIndex {
    pub fn open(path: &Path, force_sqlite: bool) -> Result<ManifestIndex> {
        let entries = if path.exists() {
            Self::load(path)?
        } else {
            vec![]
        };
        let sqlite = if force_sqlite {
            let conn = Connection::open(path.with_extension("sqlite"))?;
            conn.execute(
                "CREATE TABLE IF NOT EXISTS manifest (segment TEXT PRIMARY KEY, mtime INTEGER NOT NULL, summary BLOB NOT NULL)",
                [],
            )?;
            for e in &entries {
                conn.execute(
                    "INSERT OR REPLACE INTO manifest (segment, mtime, summary) VALUES (?1,?2,?3)",
                    params![e.segment, e.mtime, e.summary.encode()],
                )?;
            }
            Some(conn)
        } else {
            None
        };
        Ok(ManifestIndex { path: path.to_path_buf(), entries, sqlite })
    }

    fn load(path: &Path) -> Result<Vec<Entry>> {
        let data = err_at!(IOError, std::fs::read(path))?;
        let mut entries = vec![];
        let mut pos = 0;
        while pos < data.len() {
            let nl = data[pos..]
                .iter()
                .position(|b| *b == b'\n')
                .ok_or_else(|| Error::ParseError("manifest".into(), "missing header newline".into()))?;
            let header = err_at!(ParseError, std::str::from_utf8(&data[pos..pos + nl]))?;
            pos += nl + 1;
            let mut parts = header.splitn(3, '\t');
            let segment = parts.next().unwrap_or_default().to_string();
            let mtime: i64 = parts.next().unwrap_or("0").parse().unwrap_or(0);
            let len: usize = parts.next().unwrap_or("0").parse().unwrap_or(0);
            let summary = Summary::decode(&data[pos..pos + len])?;
            pos += len;
            entries.push(Entry { segment, mtime, summary });
        }
        Ok(entries)
    }

    pub fn save(&self) -> Result<()> {
        let mut out = vec![];
        for e in &self.entries {
            let bundle = e.summary.encode();
            out.extend_from_slice(format!("{}\t{}\t{}\n", e.segment, e.mtime, bundle.len()).as_bytes());
            out.extend_from_slice(&bundle);
        }
        util::write_atomic(&self.path, &out)
    }

    pub fn set_segment(&mut self, segment: &str, mtime: i64, summary: Summary) -> Result<()> {
        match self.entries.iter_mut().find(|e| e.segment == segment) {
            Some(e) => {
                e.mtime = mtime;
                e.summary = summary.clone();
            }
            None => self.entries.push(Entry { segment: segment.to_string(), mtime, summary: summary.clone() }),
        }
        if let Some(conn) = &self.sqlite {
            conn.execute(
                "INSERT OR REPLACE INTO manifest (segment, mtime, summary) VALUES (?1,?2,?3)",
                params![segment, mtime, summary.encode()],
            )?;
        }
        self.save()
    }

    pub fn remove_segment(&mut self, segment: &str) -> Result<()> {
        self.entries.retain(|e| e.segment != segment);
        if let Some(conn) = &self.sqlite {
            conn.execute("DELETE FROM manifest WHERE segment = ?1", params![segment])?;
        }
        self.save()
    }

    pub fn segments(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.segment.as_str()).collect()
    }

    pub fn segment_mtime(&self, segment: &str) -> Option<i64> {
        self.entries.iter().find(|e| e.segment == segment).map(|e| e.mtime)
    }

    /// Names of segments whose summary could satisfy `matcher` — the
    /// per-message filtering then happens at read time (§4.5: "simple
    /// datasets query by rescanning matching segments").
    pub fn segments_matching(&self, matcher: &Matcher) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.summary.filter(matcher).is_empty())
            .map(|e| e.segment.as_str())
            .collect()
    }

    pub fn total_summary(&self) -> Summary {
        let mut total = Summary::new();
        for e in &self.entries {
            total.merge(&e.summary);
        }
        total
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod manifest_test;
