//! Gzip-indexed segment: each message is its own gzip member appended to
//! one file (members concatenate validly per RFC 1952), with a sidecar
//! `.gzidx` recording each member's starting offset so a reader can list
//! members without decompressing the whole file to find boundaries.

use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use crate::{err_at, segment::Segment, util, Result};

pub struct GzSegment {
    path: PathBuf,
    idx_path: PathBuf,
    file: fs::File,
}

impl GzSegment {
    pub fn open(path: &Path) -> Result<GzSegment> {
        let file = util::open_append(path)?;
        let idx_path = idx_path_for(path);
        Ok(GzSegment { path: path.to_path_buf(), idx_path, file })
    }

    /// Offsets of every member's start, in append order, read from the
    /// `.gzidx` sidecar.
    pub fn member_offsets(&self) -> Result<Vec<u64>> {
        if !self.idx_path.exists() {
            return Ok(vec![]);
        }
        let data = err_at!(IOError, fs::read(&self.idx_path))?;
        let mut offsets = vec![];
        let mut pos = 0;
        while pos + 8 <= data.len() {
            offsets.push(u64::from_be_bytes(data[pos..pos + 8].try_into().unwrap()));
            pos += 8;
        }
        Ok(offsets)
    }

    fn record_offset(&self, offset: u64) -> Result<()> {
        let mut idx = err_at!(IOError, fs::OpenOptions::new().append(true).create(true).open(&self.idx_path))?;
        err_at!(IOError, idx.write_all(&offset.to_be_bytes()))?;
        Ok(())
    }
}

fn idx_path_for(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".gzidx");
    PathBuf::from(s)
}

impl Segment for GzSegment {
    fn append(&mut self, data: &[u8]) -> Result<(u64, u64)> {
        let mut compressed = vec![];
        {
            let mut encoder = GzEncoder::new(&mut compressed, Compression::default());
            err_at!(IOError, encoder.write_all(data))?;
            err_at!(IOError, encoder.finish())?;
        }
        let (offset, _) = util::append(&mut self.file, &compressed)?;
        self.record_offset(offset)?;
        Ok((offset, data.len() as u64))
    }

    fn read(&self, offset: u64, size: u64) -> Result<Vec<u8>> {
        let whole = err_at!(IOError, fs::read(&self.path))?;
        if offset as usize > whole.len() {
            return err_at!(ConsistencyError, msg: "segment offset {} past end of file", offset);
        }
        let mut decoder = GzDecoder::new(&whole[offset as usize..]);
        let mut out = vec![];
        err_at!(IOError, decoder.read_to_end(&mut out))?;
        if out.len() as u64 != size {
            return err_at!(ConsistencyError, msg: "decompressed member is {} bytes, index says {}", out.len(), size);
        }
        Ok(out)
    }

    fn len(&self) -> Result<u64> {
        let meta = err_at!(IOError, self.file.metadata())?;
        Ok(meta.len())
    }
}

#[cfg(test)]
#[path = "gz_test.rs"]
mod gz_test;
