//! The `ondisk2`/`iseg` per-message sqlite index (§6): one `sub_<kind>`
//! attribute table per indexed kind holding its distinct encoded values,
//! an INTEGER column in `md` referencing each, and a real `UNIQUE`
//! constraint over the unique kinds' columns. An absent value for an
//! indexed kind is stored as the reserved id `0` rather than SQL `NULL`,
//! since SQLite's `UNIQUE` constraint treats `NULL` as distinct from
//! every other `NULL` — which would let two messages that both lack the
//! same kind coexist, defeating the Open Question resolution that they
//! should collide (see `SPEC_FULL.md`). Row ids in a `sub_<kind>` table
//! start at 1, so `0` can never collide with a real interned value.
//!
//! `md` also carries a `metadata BLOB` column holding the full encoded
//! `ItemSet`: the literal schema has no room for kinds outside the
//! configured `index` list, and this crate has no `.metadata` sidecar
//! file to fall back on, so the blob is the round-trip path for anything
//! not broken out into its own column.

use std::path::Path;

use rusqlite::{types::ToSql, Connection, OptionalExtension};

use crate::{
    err_at,
    index::{DataQuery, IndexEntry},
    types::{Item, ItemSet, KindCode},
    Error, Result,
};

/// Reserved id meaning "this kind is absent from the message", stored in
/// place of SQL `NULL` so `UNIQUE` still catches duplicate absences.
const ABSENT_ID: i64 = 0;

fn column_name(kind: KindCode) -> String {
    format!("col_{}", kind.name())
}

fn attr_table_name(kind: KindCode) -> String {
    format!("sub_{}", kind.name())
}

fn format_reftime(t: chrono::NaiveDateTime) -> String {
    // Fixed-width zero-padded ISO8601 sorts lexicographically the same as
    // chronologically, so a TEXT column still supports range pushdown.
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub struct SqliteIndex {
    conn: Connection,
    index_kinds: Vec<KindCode>,
    unique_kinds: Vec<KindCode>,
}

impl SqliteIndex {
    pub fn open(path: &Path, index_kinds: Vec<KindCode>, unique_kinds: Vec<KindCode>) -> Result<SqliteIndex> {
        if let Some(parent) = path.parent() {
            err_at!(IOError, std::fs::create_dir_all(parent))?;
        }
        let mut index_kinds = index_kinds;
        for kind in &unique_kinds {
            if !index_kinds.contains(kind) {
                index_kinds.push(*kind);
            }
        }

        let conn = Connection::open(path)?;
        for kind in &index_kinds {
            conn.execute(
                &format!("CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY, val BLOB UNIQUE)", attr_table_name(*kind)),
                [],
            )?;
        }

        let mut extra_cols = String::new();
        for kind in &index_kinds {
            extra_cols.push_str(&format!(", {} INTEGER NOT NULL DEFAULT {}", column_name(*kind), ABSENT_ID));
        }
        let unique_clause = if unique_kinds.is_empty() {
            String::new()
        } else {
            format!(", UNIQUE({})", unique_kinds.iter().map(|k| column_name(*k)).collect::<Vec<_>>().join(","))
        };
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS md (
                    id INTEGER PRIMARY KEY,
                    format TEXT NOT NULL,
                    file TEXT NOT NULL,
                    offset INTEGER NOT NULL,
                    size INTEGER NOT NULL,
                    notes BLOB,
                    reftime TEXT,
                    metadata BLOB NOT NULL
                    {extra_cols}
                    {unique_clause}
                )"
            ),
            [],
        )?;
        conn.execute("CREATE INDEX IF NOT EXISTS md_reftime ON md(reftime)", [])?;
        conn.execute("CREATE INDEX IF NOT EXISTS md_file_offset ON md(file, offset)", [])?;
        Ok(SqliteIndex { conn, index_kinds, unique_kinds })
    }

    /// Look up a value already interned in `kind`'s attribute table,
    /// without creating one. `None` means this exact value has never
    /// been seen, so no row in `md` can already reference it.
    fn lookup(&self, kind: KindCode, encoded: &[u8]) -> Result<Option<i64>> {
        Ok(self
            .conn
            .query_row(&format!("SELECT id FROM {} WHERE val = ?1", attr_table_name(kind)), [encoded], |row| row.get(0))
            .optional()?)
    }

    /// Look up a value in `kind`'s attribute table, interning it first if
    /// this is the first time it's been seen.
    fn intern(&self, kind: KindCode, encoded: &[u8]) -> Result<i64> {
        if let Some(id) = self.lookup(kind, encoded)? {
            return Ok(id);
        }
        self.conn.execute(&format!("INSERT INTO {} (val) VALUES (?1)", attr_table_name(kind)), [encoded])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_by_unique(&self, values: &[i64]) -> Result<Option<i64>> {
        if self.unique_kinds.is_empty() {
            return Ok(None);
        }
        let where_clause = self
            .unique_kinds
            .iter()
            .enumerate()
            .map(|(i, k)| format!("{} = ?{}", column_name(*k), i + 1))
            .collect::<Vec<_>>()
            .join(" AND ");
        let sql = format!("SELECT id FROM md WHERE {}", where_clause);
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        Ok(stmt.query_row(params.as_slice(), |row| row.get(0)).optional()?)
    }

    /// Resolve `set`'s unique-kind values to their interned (or absent
    /// sentinel) ids, without creating new attribute rows. A value that
    /// has never been interned can't already exist on any `md` row, so
    /// callers short-circuit to "not found" in that case.
    fn unique_values_readonly(&self, set: &ItemSet) -> Result<Option<Vec<i64>>> {
        let mut values = Vec::with_capacity(self.unique_kinds.len());
        for kind in &self.unique_kinds {
            let v = match set.get(*kind) {
                Some(item) => match self.lookup(*kind, &item.encode())? {
                    Some(id) => id,
                    None => return Ok(None),
                },
                None => ABSENT_ID,
            };
            values.push(v);
        }
        Ok(Some(values))
    }

    /// Does a row already carry this unique-kind combination? Used by the
    /// writer to decide, before appending any bytes, whether an incoming
    /// message would be a duplicate under `Default`/`ReplaceNever` (§4.8).
    pub fn exists_for_unique(&self, set: &ItemSet) -> Result<bool> {
        if self.unique_kinds.is_empty() {
            return Ok(false);
        }
        match self.unique_values_readonly(set)? {
            Some(values) => Ok(self.find_by_unique(&values)?.is_some()),
            None => Ok(false),
        }
    }

    /// Insert one message. `on_conflict` governs what happens when its
    /// unique-kind combination already exists (§4.8's acquire modes).
    pub fn insert(
        &mut self,
        file: &str,
        offset: u64,
        size: u64,
        set: &ItemSet,
        on_conflict: OnConflict,
    ) -> Result<InsertOutcome> {
        let format = file.rsplit('.').next().unwrap_or("").to_string();
        let reftime = match set.get(KindCode::Reftime) {
            Some(Item::Reftime(rt)) => Some(format_reftime(rt.age_instant())),
            _ => None,
        };
        let notes = set.get(KindCode::Note).map(|n| n.encode());
        let metadata = set.encode();

        let mut col_names = Vec::with_capacity(self.index_kinds.len());
        let mut col_values = Vec::with_capacity(self.index_kinds.len());
        for kind in &self.index_kinds {
            let v = match set.get(*kind) {
                Some(item) => self.intern(*kind, &item.encode())?,
                None => ABSENT_ID,
            };
            col_names.push(column_name(*kind));
            col_values.push(v);
        }

        let unique_values: Vec<i64> =
            self.unique_kinds.iter().map(|k| col_values[self.index_kinds.iter().position(|ik| ik == k).unwrap()]).collect();
        let existing = self.find_by_unique(&unique_values)?;

        match (existing, on_conflict) {
            (None, _) => {
                let mut cols = vec!["format".to_string(), "file".to_string(), "offset".to_string(), "size".to_string(), "notes".to_string(), "reftime".to_string(), "metadata".to_string()];
                cols.extend(col_names.clone());
                let placeholders: Vec<String> = (1..=cols.len()).map(|i| format!("?{}", i)).collect();
                let sql = format!("INSERT INTO md ({}) VALUES ({})", cols.join(","), placeholders.join(","));

                let mut values: Vec<Box<dyn ToSql>> = vec![
                    Box::new(format),
                    Box::new(file.to_string()),
                    Box::new(offset as i64),
                    Box::new(size as i64),
                    Box::new(notes),
                    Box::new(reftime),
                    Box::new(metadata),
                ];
                for v in col_values {
                    values.push(Box::new(v));
                }
                let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
                self.conn.execute(&sql, params.as_slice())?;
                Ok(InsertOutcome::Inserted)
            }
            (Some(_), OnConflict::Reject) => err_at!(DuplicateError, msg: "duplicate unique key for {:?}", file),
            (Some(id), OnConflict::Replace) => {
                let mut assignments = vec!["format=?1".to_string(), "file=?2".to_string(), "offset=?3".to_string(), "size=?4".to_string(), "notes=?5".to_string(), "reftime=?6".to_string(), "metadata=?7".to_string()];
                let mut values: Vec<Box<dyn ToSql>> = vec![
                    Box::new(format),
                    Box::new(file.to_string()),
                    Box::new(offset as i64),
                    Box::new(size as i64),
                    Box::new(notes),
                    Box::new(reftime),
                    Box::new(metadata),
                ];
                for (i, (name, v)) in col_names.iter().zip(col_values.iter()).enumerate() {
                    assignments.push(format!("{}=?{}", name, i + 8));
                    values.push(Box::new(*v));
                }
                values.push(Box::new(id));
                let sql = format!("UPDATE md SET {} WHERE id=?{}", assignments.join(","), values.len());
                let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
                self.conn.execute(&sql, params.as_slice())?;
                Ok(InsertOutcome::Replaced)
            }
            (Some(_), OnConflict::Skip) => Ok(InsertOutcome::Skipped),
        }
    }

    pub fn remove_segment(&mut self, file: &str) -> Result<()> {
        self.conn.execute("DELETE FROM md WHERE file = ?1", [file])?;
        Ok(())
    }

    pub fn query(&self, query: &DataQuery) -> Result<Vec<IndexEntry>> {
        let sql = match query.matcher.as_ref().and_then(|m| m.reftime_sql("reftime")) {
            Some(restriction) => format!("SELECT file, offset, size, metadata FROM md WHERE {}", restriction),
            None => "SELECT file, offset, size, metadata FROM md".to_string(),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            let file: String = row.get(0)?;
            let offset: i64 = row.get(1)?;
            let size: i64 = row.get(2)?;
            let metadata: Vec<u8> = row.get(3)?;
            Ok((file, offset as u64, size as u64, metadata))
        })?;

        let mut out = vec![];
        for row in rows {
            let (segment, offset, size, metadata) = row?;
            let set = ItemSet::decode(&metadata)?;
            if query.accepts(&set) {
                out.push(IndexEntry { segment, offset, size, metadata: set });
            }
        }
        Ok(out)
    }

    /// Every row for `file`, with its row id, for the checker's repack
    /// pass (§4.10).
    pub fn entries_for_segment(&self, file: &str) -> Result<Vec<(i64, u64, u64, ItemSet)>> {
        let mut stmt = self.conn.prepare("SELECT id, offset, size, metadata FROM md WHERE file = ?1 ORDER BY offset")?;
        let rows = stmt.query_map([file], |row| {
            let id: i64 = row.get(0)?;
            let offset: i64 = row.get(1)?;
            let size: i64 = row.get(2)?;
            let metadata: Vec<u8> = row.get(3)?;
            Ok((id, offset as u64, size as u64, metadata))
        })?;
        let mut out = vec![];
        for row in rows {
            let (id, offset, size, metadata) = row?;
            out.push((id, offset, size, ItemSet::decode(&metadata)?));
        }
        Ok(out)
    }

    pub fn set_offset_size(&mut self, id: i64, offset: u64, size: u64) -> Result<()> {
        self.conn.execute("UPDATE md SET offset=?1, size=?2 WHERE id=?3", (offset as i64, size as i64, id))?;
        Ok(())
    }

    /// Repoint every row for `old_file` to `new_file`, used when a
    /// segment moves into the archive subtree (§4.9).
    pub fn rename_segment(&mut self, old_file: &str, new_file: &str) -> Result<()> {
        self.conn.execute("UPDATE md SET file=?1 WHERE file=?2", [new_file, old_file])?;
        Ok(())
    }

    pub fn segments(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT file FROM md ORDER BY file")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = vec![];
        for row in rows {
            out.push(row.map_err(Error::from)?);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    Reject,
    Replace,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Replaced,
    Skipped,
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod sqlite_test;
