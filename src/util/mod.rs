//! Common helpers: varint codec, buffered file I/O, and advisory locking.

use std::{
    fs,
    io::{Read, Seek, Write},
    path::Path,
};

use crate::{err_at, Error, Result};

pub mod lock;
pub mod varint;

/// Read exactly `n` bytes starting at `pos` from `fd`. Takes a shared
/// reference: `File`'s `Seek`/`Read` impls operate through the OS file
/// descriptor, not in-process buffering, so concurrent readers don't race.
pub fn read_at(fd: &fs::File, pos: u64, n: u64) -> Result<Vec<u8>> {
    let mut reader = fd;
    err_at!(IOError, reader.seek(std::io::SeekFrom::Start(pos)))?;
    let mut buf = vec![0u8; usize::try_from(n)?];
    err_at!(IOError, reader.read_exact(&mut buf))?;
    Ok(buf)
}

/// Append `data` to `fd`, returning the offset at which it was written and
/// its length. `fd` must be opened in append mode.
pub fn append(fd: &mut fs::File, data: &[u8]) -> Result<(u64, u64)> {
    let off = err_at!(IOError, fd.metadata())?.len();
    let n = err_at!(IOError, fd.write(data))?;
    if n != data.len() {
        return err_at!(IOError, msg: "partial write {}/{}", n, data.len());
    }
    Ok((off, n as u64))
}

/// Open (creating parent directories and the file if missing) a file in
/// append mode, never truncating existing content.
pub fn open_append(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        err_at!(IOError, fs::create_dir_all(parent))?;
    }
    err_at!(IOError, fs::OpenOptions::new().append(true).create(true).open(path))
}

pub fn open_read(path: &Path) -> Result<fs::File> {
    err_at!(IOError, fs::OpenOptions::new().read(true).open(path))
}

/// Create `path` exclusively (`O_EXCL`): fails with `ErrorKind::AlreadyExists`
/// if it already exists rather than silently truncating it. Callers that
/// allocate the file name from a shared counter retry with a fresh name on
/// that specific error instead of propagating it.
pub fn create_exclusive(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new().write(true).create_new(true).open(path)
}

/// Atomically replace `path` with `data`: write to `path.tmp`, fsync, rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        err_at!(IOError, fs::create_dir_all(parent))?;
    }
    let tmp = path.with_extension("tmp");
    {
        let mut f = err_at!(IOError, fs::File::create(&tmp))?;
        err_at!(IOError, f.write_all(data))?;
        err_at!(IOError, f.sync_all())?;
    }
    err_at!(IOError, fs::rename(&tmp, path))?;
    Ok(())
}
