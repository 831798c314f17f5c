//! Private bounded copies of volatile resources
//!
//! Resources whose storage cannot be reopened are windowed by copying the
//! requested range into a store owned by the window. Small copies stay in
//! memory; copies above the spill threshold go to an anonymous temporary file
//! that the OS removes once the handle is dropped.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// Copies at or below this size are kept in memory (2 MiB)
pub const DEFAULT_SPILL_THRESHOLD: u64 = 2 * 1024 * 1024;

/// Buffer size used when copying into the store (64KB)
const COPY_CHUNK_SIZE: usize = 64 * 1024;

/// Storage behind a snapshot copy
#[derive(Debug)]
pub enum SnapshotStore {
    Memory(Cursor<Vec<u8>>),
    Spilled(File),
}

impl SnapshotStore {
    /// Copy up to `length` bytes from the current position of `source`
    ///
    /// Returns the store positioned at 0 together with the number of bytes
    /// actually copied, which is less than `length` only when `source` ends early.
    pub fn copy_from<R: Read + ?Sized>(
        source: &mut R,
        length: u64,
        spill_threshold: u64,
    ) -> io::Result<(Self, u64)> {
        let mut limited = source.take(length);

        let (mut store, copied) = if length <= spill_threshold {
            let mut data = Vec::with_capacity(length.min(COPY_CHUNK_SIZE as u64) as usize);
            let copied = limited.read_to_end(&mut data)? as u64;
            (SnapshotStore::Memory(Cursor::new(data)), copied)
        } else {
            let mut file = tempfile::tempfile()?;
            let copied = copy_chunked(&mut limited, &mut file)?;
            file.flush()?;
            (SnapshotStore::Spilled(file), copied)
        };

        store.seek(SeekFrom::Start(0))?;
        Ok((store, copied))
    }

    pub fn is_spilled(&self) -> bool {
        matches!(self, SnapshotStore::Spilled(_))
    }
}

fn copy_chunked<R: Read + ?Sized, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut buffer = vec![0u8; COPY_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..n])?;
        total += n as u64;
    }
}

impl Read for SnapshotStore {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SnapshotStore::Memory(cursor) => cursor.read(buf),
            SnapshotStore::Spilled(file) => file.read(buf),
        }
    }
}

impl Seek for SnapshotStore {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            SnapshotStore::Memory(cursor) => cursor.seek(pos),
            SnapshotStore::Spilled(file) => file.seek(pos),
        }
    }
}
