//! Directory-of-files segment: each message is its own file, named by a
//! monotonic id drawn from a `.sequence` counter file guarded by an
//! advisory lock held only for the read-modify-write (§4.4, §5).

use std::{fs, io::Write, path::PathBuf};

use crate::{err_at, segment::Segment, util, util::lock::with_sequence_lock, Result};

pub struct DirSegment {
    dir: PathBuf,
}

fn file_name(id: u64) -> String {
    format!("{:010}", id)
}

impl DirSegment {
    pub fn open(dir: &std::path::Path) -> Result<DirSegment> {
        err_at!(IOError, fs::create_dir_all(dir))?;
        Ok(DirSegment { dir: dir.to_path_buf() })
    }

    fn sequence_path(&self) -> PathBuf {
        self.dir.join(".sequence")
    }

    fn next_id(&self) -> Result<u64> {
        with_sequence_lock(&self.sequence_path(), |file| {
            use std::io::{Read, Seek, SeekFrom, Write};
            let mut text = String::new();
            err_at!(IOError, file.read_to_string(&mut text))?;
            let current: u64 = text.trim().parse().unwrap_or(0);
            let next = current + 1;
            err_at!(IOError, file.seek(SeekFrom::Start(0)))?;
            err_at!(IOError, file.set_len(0))?;
            err_at!(IOError, file.write_all(next.to_string().as_bytes()))?;
            Ok(current)
        })
    }
}

impl Segment for DirSegment {
    /// Each message gets its own file, named from the sequence counter.
    /// The create is `O_EXCL` rather than create-or-truncate: if a name
    /// is somehow already taken (a prior crash left the counter behind
    /// its directory, say) this retries with the next id instead of
    /// silently overwriting whatever is there (§4.4).
    fn append(&mut self, data: &[u8]) -> Result<(u64, u64)> {
        loop {
            let id = self.next_id()?;
            let path = self.dir.join(file_name(id));
            match util::create_exclusive(&path) {
                Ok(mut file) => {
                    err_at!(IOError, file.write_all(data))?;
                    err_at!(IOError, file.sync_all())?;
                    return Ok((id, data.len() as u64));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read(&self, offset: u64, size: u64) -> Result<Vec<u8>> {
        let path = self.dir.join(file_name(offset));
        let data = err_at!(IOError, fs::read(&path))?;
        if data.len() as u64 != size {
            return err_at!(ConsistencyError, msg: "segment member {} has size {} but index says {}", offset, data.len(), size);
        }
        Ok(data)
    }

    fn len(&self) -> Result<u64> {
        let mut total = 0u64;
        for entry in err_at!(IOError, fs::read_dir(&self.dir))? {
            let entry = err_at!(IOError, entry)?;
            if entry.file_name() == ".sequence" {
                continue;
            }
            total += err_at!(IOError, entry.metadata())?.len();
        }
        Ok(total)
    }
}

#[cfg(test)]
#[path = "dir_test.rs"]
mod dir_test;
