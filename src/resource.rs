//! Backing resources
//!
//! A backing resource is a caller-owned, readable source a window is carved
//! out of. The resolver needs two facts about it: whether it can be positioned
//! at random, and whether its storage can be opened a second time by name.

use crate::domain::ResourceId;
use log::debug;
use rustc_hash::FxHashMap as HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Whether a resource's storage can be reached independently of its handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOrigin {
    /// Storage has a stable name another open can target
    Reopenable(PathBuf),
    /// Data lives only in this handle's private state
    Volatile,
}

/// Trait for sources a window can be opened on
pub trait BackingResource: Read + Seek {
    /// How the resolver may reach this resource's storage
    fn origin(&self) -> ResourceOrigin;

    /// Whether random-access positioning is supported
    fn is_seekable(&self) -> bool {
        true
    }
}

/// A file opened from a path
#[derive(Debug)]
pub struct FileResource {
    file: File,
    path: PathBuf,
}

impl FileResource {
    /// Open `path` for reading
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(FileResource { file, path })
    }

    /// Wrap an already open file together with the path it was opened from
    pub fn from_file(file: File, path: PathBuf) -> Self {
        FileResource { file, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for FileResource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for FileResource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl BackingResource for FileResource {
    fn origin(&self) -> ResourceOrigin {
        ResourceOrigin::Reopenable(self.path.clone())
    }

    /// Pipes, sockets and character devices report a position but cannot seek
    fn is_seekable(&self) -> bool {
        self.file
            .metadata()
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }
}

/// A process-local, memory-only buffer
#[derive(Debug, Default)]
pub struct MemoryResource {
    cursor: Cursor<Vec<u8>>,
}

impl MemoryResource {
    pub fn new(data: Vec<u8>) -> Self {
        MemoryResource {
            cursor: Cursor::new(data),
        }
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn get_ref(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl From<Vec<u8>> for MemoryResource {
    fn from(data: Vec<u8>) -> Self {
        MemoryResource::new(data)
    }
}

impl Read for MemoryResource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for MemoryResource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl BackingResource for MemoryResource {
    fn origin(&self) -> ResourceOrigin {
        ResourceOrigin::Volatile
    }
}

/// Caller-owned table of open resources, addressed by [`ResourceId`]
///
/// Locators may name a resource by id; the table is how those ids are
/// resolved. Dropping the table closes every resource still in it.
#[derive(Default)]
pub struct ResourceTable {
    resources: HashMap<ResourceId, Box<dyn BackingResource>>,
    next_id: u64,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource and return the id it was registered under
    ///
    /// Ids count up from 1. Past `u64::MAX` they wrap and skip ids in use.
    pub fn insert(&mut self, resource: Box<dyn BackingResource>) -> ResourceId {
        let id = loop {
            self.next_id = self.next_id.checked_add(1).unwrap_or(1);
            let candidate = ResourceId::new(self.next_id);
            if !self.resources.contains_key(&candidate) {
                break candidate;
            }
        };
        self.resources.insert(id, resource);
        debug!("Registered resource {}", id);
        id
    }

    /// Register a resource under a caller-chosen id, returning any resource it replaces
    pub fn insert_with_id(
        &mut self,
        id: ResourceId,
        resource: Box<dyn BackingResource>,
    ) -> Option<Box<dyn BackingResource>> {
        self.next_id = self.next_id.max(id.as_u64());
        self.resources.insert(id, resource)
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut (dyn BackingResource + 'static)> {
        self.resources.get_mut(&id).map(|r| r.as_mut())
    }

    pub fn remove(&mut self, id: ResourceId) -> Option<Box<dyn BackingResource>> {
        self.resources.remove(&id)
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
