//! Plain append-only file segment: messages are concatenated back to back,
//! addressed purely by byte offset/size (the default for GRIB/BUFR data).

use std::{fs, path::Path};

use crate::{err_at, segment::Segment, util, Result};

pub struct ConcatSegment {
    file: fs::File,
}

impl ConcatSegment {
    pub fn open(path: &Path) -> Result<ConcatSegment> {
        Ok(ConcatSegment { file: util::open_append(path)? })
    }
}

impl Segment for ConcatSegment {
    fn append(&mut self, data: &[u8]) -> Result<(u64, u64)> {
        util::append(&mut self.file, data)
    }

    fn read(&self, offset: u64, size: u64) -> Result<Vec<u8>> {
        util::read_at(&self.file, offset, size)
    }

    fn len(&self) -> Result<u64> {
        let meta = err_at!(IOError, self.file.metadata())?;
        Ok(meta.len())
    }
}

#[cfg(test)]
#[path = "concat_test.rs"]
mod concat_test;
