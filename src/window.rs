//! Bounded read-only windows
//!
//! A [`Window`] restricts a resolved handle to the absolute range
//! `[min, max)`. Callers see relative positions `0..len`; the window never
//! reads or seeks the handle outside its range.
//!
//! Every read re-seeks the handle to the window's own position before reading,
//! so the handle's position between calls does not matter.

use crate::config::SeekPolicy;
use crate::domain::ByteRange;
use crate::error::Result;
use crate::resolver::{ResourceOpenMode, Resolver};
use crate::resource::BackingResource;
use crate::snapshot::SnapshotStore;
use log::trace;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Raw `SEEK_SET` value
pub const SEEK_SET: i32 = 0;
/// Raw `SEEK_CUR` value
pub const SEEK_CUR: i32 = 1;
/// Raw `SEEK_END` value
pub const SEEK_END: i32 = 2;

/// Largest buffer a single [`Window::read`] allocates
const MAX_READ_CHUNK: usize = 64 * 1024;

/// Reference point for a seek
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

impl TryFrom<i32> for Whence {
    type Error = i32;

    fn try_from(raw: i32) -> std::result::Result<Self, i32> {
        match raw {
            SEEK_SET => Ok(Whence::Start),
            SEEK_CUR => Ok(Whence::Current),
            SEEK_END => Ok(Whence::End),
            other => Err(other),
        }
    }
}

/// Size information for a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStat {
    pub size: u64,
}

/// Handle a window reads through
#[derive(Debug)]
enum WindowHandle {
    File(File),
    Snapshot(SnapshotStore),
}

impl Read for WindowHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            WindowHandle::File(file) => file.read(buf),
            WindowHandle::Snapshot(store) => store.read(buf),
        }
    }
}

impl Seek for WindowHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            WindowHandle::File(file) => file.seek(pos),
            WindowHandle::Snapshot(store) => store.seek(pos),
        }
    }
}

/// A read-only view of `[min, max)` on a resolved handle
#[derive(Debug)]
pub struct Window {
    handle: Option<WindowHandle>,
    enforce_offset_min: u64,
    enforce_offset_max: u64,
    /// Absolute position on the handle, kept within `[min, max]`
    offset: u64,
    seek_policy: SeekPolicy,
}

impl Window {
    /// Build a window over a resolved resource
    pub fn new(mode: ResourceOpenMode, seek_policy: SeekPolicy) -> Self {
        let (min, max) = mode.bounds();
        let handle = match mode {
            ResourceOpenMode::DirectReopen { file, .. } => WindowHandle::File(file),
            ResourceOpenMode::SnapshotCopy { store, .. } => WindowHandle::Snapshot(store),
        };

        Window {
            handle: Some(handle),
            enforce_offset_min: min,
            enforce_offset_max: max,
            offset: min,
            seek_policy,
        }
    }

    /// Open a window on the file at `path`
    pub fn open_path<P: AsRef<Path>>(path: P, offset: u64, length: u64) -> Result<Self> {
        let range = ByteRange::new(offset, length)?;
        let mode = Resolver::default().resolve_path(path.as_ref(), range)?;
        Ok(Window::new(mode, SeekPolicy::default()))
    }

    /// Open a window on an already open resource
    ///
    /// The resource's position is the same after this returns as before.
    pub fn from_resource(
        resource: &mut dyn BackingResource,
        offset: u64,
        length: u64,
    ) -> Result<Self> {
        let range = ByteRange::new(offset, length)?;
        let mode = Resolver::default().resolve(resource, range)?;
        Ok(Window::new(mode, SeekPolicy::default()))
    }

    /// Read up to `count` bytes, clamped to the window
    ///
    /// At most 64 KiB is returned per call. Returns an empty vector at the
    /// end of the window.
    pub fn read(&mut self, count: usize) -> io::Result<Vec<u8>> {
        let remaining = self.enforce_offset_max.saturating_sub(self.offset);
        let real_count = (count as u64).min(remaining).min(MAX_READ_CHUNK as u64) as usize;
        let mut buffer = vec![0u8; real_count];
        let n = self.read_into(&mut buffer)?;
        buffer.truncate(n);
        Ok(buffer)
    }

    /// Read into `buf`, clamped to the window. Short reads are passed through.
    pub fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let handle = self.handle.as_mut().ok_or_else(closed_error)?;

        let remaining = self.enforce_offset_max.saturating_sub(self.offset);
        let real_count = (buf.len() as u64).min(remaining) as usize;
        if real_count == 0 {
            return Ok(0);
        }

        handle.seek(SeekFrom::Start(self.offset))?;
        let n = loop {
            match handle.read(&mut buf[..real_count]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        self.offset += n as u64;

        trace!(
            "read {} of {} requested bytes, now at {}",
            n,
            buf.len(),
            self.offset - self.enforce_offset_min
        );
        Ok(n)
    }

    /// Move to `delta` relative to `whence`
    ///
    /// Returns `false` and leaves the position unchanged when the target is
    /// outside the window (see [`SeekPolicy`] for the upper bound) or the
    /// window is closed.
    pub fn seek(&mut self, delta: i64, whence: Whence) -> bool {
        if self.handle.is_none() {
            return false;
        }

        let base = match whence {
            Whence::Start => self.enforce_offset_min,
            Whence::Current => self.offset,
            Whence::End => self.enforce_offset_max,
        };
        let candidate = base as i128 + delta as i128;

        if !self
            .seek_policy
            .accepts(candidate, self.enforce_offset_min, self.enforce_offset_max)
        {
            trace!("rejected seek {} from {:?}", delta, whence);
            return false;
        }

        self.offset = candidate as u64;
        true
    }

    /// Seek with a raw `SEEK_SET`/`SEEK_CUR`/`SEEK_END` value
    pub fn seek_raw(&mut self, delta: i64, whence: i32) -> bool {
        match Whence::try_from(whence) {
            Ok(whence) => self.seek(delta, whence),
            Err(_) => false,
        }
    }

    /// Relative position, or `None` when the position is not inside the window
    pub fn tell(&self) -> Option<u64> {
        if self.offset < self.enforce_offset_min || self.enforce_offset_max <= self.offset {
            return None;
        }
        Some(self.offset - self.enforce_offset_min)
    }

    pub fn eof(&self) -> bool {
        self.offset >= self.enforce_offset_max
    }

    pub fn stat(&self) -> WindowStat {
        WindowStat { size: self.len() }
    }

    pub fn len(&self) -> u64 {
        self.enforce_offset_max - self.enforce_offset_min
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release the handle. Calling again has no effect.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            trace!(
                "closed window [{}, {})",
                self.enforce_offset_min,
                self.enforce_offset_max
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "window is closed")
}

impl Read for Window {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf)
    }
}

impl Seek for Window {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (delta, whence) = match pos {
            SeekFrom::Start(n) => {
                let n = i64::try_from(n).map_err(|_| out_of_window(pos))?;
                (n, Whence::Start)
            }
            SeekFrom::Current(n) => (n, Whence::Current),
            SeekFrom::End(n) => (n, Whence::End),
        };

        if !Window::seek(self, delta, whence) {
            return Err(out_of_window(pos));
        }
        Ok(self.offset - self.enforce_offset_min)
    }
}

fn out_of_window(pos: SeekFrom) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("seek {:?} is outside the window", pos),
    )
}

impl Drop for Window {
    fn drop(&mut self) {
        self.close();
    }
}
