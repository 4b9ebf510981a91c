//! The on-disk summary cache (§4.6): one file per month plus an `all`
//! roll-up, invalidated and rewritten atomically whenever a segment's
//! contribution changes so a reader never observes a partially-written
//! cache file.

use std::path::{Path, PathBuf};

use crate::{err_at, summary::Summary, util, Result};

pub struct SummaryCache {
    dir: PathBuf,
}

fn month_file_name(year: i32, month: u32) -> String {
    format!("{:04}-{:02}.summary", year, month)
}

const ALL_FILE_NAME: &str = "all.summary";

impl SummaryCache {
    pub fn open(dir: &Path) -> Result<SummaryCache> {
        err_at!(IOError, std::fs::create_dir_all(dir))?;
        Ok(SummaryCache { dir: dir.to_path_buf() })
    }

    fn month_path(&self, year: i32, month: u32) -> PathBuf {
        self.dir.join(month_file_name(year, month))
    }

    fn all_path(&self) -> PathBuf {
        self.dir.join(ALL_FILE_NAME)
    }

    pub fn get_month(&self, year: i32, month: u32) -> Result<Option<Summary>> {
        Self::read_if_present(&self.month_path(year, month))
    }

    pub fn get_all(&self) -> Result<Option<Summary>> {
        Self::read_if_present(&self.all_path())
    }

    fn read_if_present(path: &Path) -> Result<Option<Summary>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = err_at!(IOError, std::fs::read(path))?;
        Ok(Some(Summary::decode(&data)?))
    }

    /// Replace a month's cached summary and drop the now-stale `all`
    /// roll-up; callers rebuild it lazily via [`rebuild_all`].
    pub fn put_month(&self, year: i32, month: u32, summary: &Summary) -> Result<()> {
        util::write_atomic(&self.month_path(year, month), &summary.encode())?;
        self.invalidate_all()
    }

    pub fn invalidate_month(&self, year: i32, month: u32) -> Result<()> {
        let path = self.month_path(year, month);
        if path.exists() {
            err_at!(IOError, std::fs::remove_file(&path))?;
        }
        self.invalidate_all()
    }

    fn invalidate_all(&self) -> Result<()> {
        let path = self.all_path();
        if path.exists() {
            err_at!(IOError, std::fs::remove_file(&path))?;
        }
        Ok(())
    }

    /// Merge every cached month into `all.summary`, writing it atomically.
    /// Called when [`get_all`] misses.
    pub fn rebuild_all(&self) -> Result<Summary> {
        let mut total = Summary::new();
        for entry in err_at!(IOError, std::fs::read_dir(&self.dir))? {
            let entry = err_at!(IOError, entry)?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == ALL_FILE_NAME || !name.ends_with(".summary") {
                continue;
            }
            let data = err_at!(IOError, std::fs::read(entry.path()))?;
            total.merge(&Summary::decode(&data)?);
        }
        util::write_atomic(&self.all_path(), &total.encode())?;
        Ok(total)
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;
