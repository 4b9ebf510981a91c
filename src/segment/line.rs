//! Line-delimited segment, used for the CSV point-data format: each
//! message is one newline-terminated record, stored back to back like
//! [`crate::segment::concat::ConcatSegment`] but with a newline appended
//! after every record so segment boundaries can be rediscovered from the
//! bytes alone (not just from the index).

use std::path::Path;

use crate::{segment::Segment, util, Result};

pub struct LineSegment {
    file: std::fs::File,
}

impl LineSegment {
    pub fn open(path: &Path) -> Result<LineSegment> {
        Ok(LineSegment { file: util::open_append(path)? })
    }

    /// Scan the whole file and return `(offset, size)` for every line,
    /// excluding the trailing newline. Used by the checker to rebuild an
    /// index from raw segment bytes (§4.10).
    pub fn scan_lines(&self) -> Result<Vec<(u64, u64)>> {
        let len = Segment::len(self)?;
        let data = util::read_at(&self.file, 0, len)?;
        let mut out = vec![];
        let mut start = 0u64;
        for (i, byte) in data.iter().enumerate() {
            if *byte == b'\n' {
                out.push((start, i as u64 - start));
                start = i as u64 + 1;
            }
        }
        Ok(out)
    }
}

impl Segment for LineSegment {
    fn append(&mut self, data: &[u8]) -> Result<(u64, u64)> {
        let mut line = data.to_vec();
        line.push(b'\n');
        let (offset, size) = util::append(&mut self.file, &line)?;
        Ok((offset, size - 1))
    }

    fn read(&self, offset: u64, size: u64) -> Result<Vec<u8>> {
        util::read_at(&self.file, offset, size)
    }

    fn len(&self) -> Result<u64> {
        let meta = crate::err_at!(IOError, self.file.metadata())?;
        Ok(meta.len())
    }
}

#[cfg(test)]
#[path = "line_test.rs"]
mod line_test;
