//! Backing resource resolution
//!
//! Decides, once per open, how a window reaches its bytes:
//!
//! - **DirectReopen**: the resource's storage has a name (a file path), so a
//!   second, independent handle is opened on it and the window bounds are
//!   absolute offsets on that handle. The caller's handle is never touched.
//! - **SnapshotCopy**: the storage is private to the caller's handle (an
//!   in-memory buffer), so the requested range is copied into a store owned by
//!   the window, whose bounds become `[0, length)`. The caller's handle is
//!   repositioned for the copy and restored before returning.

use crate::domain::ByteRange;
use crate::error::{Result, SubstreamError};
use crate::resource::{BackingResource, ResourceOrigin};
use crate::snapshot::{SnapshotStore, DEFAULT_SPILL_THRESHOLD};
use log::{debug, warn};
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// How a window's handle was obtained
#[derive(Debug)]
pub enum ResourceOpenMode {
    /// Fresh handle on named storage, bounded by absolute offsets
    DirectReopen {
        path: PathBuf,
        file: File,
        physical_offset: u64,
        physical_max: u64,
    },
    /// Private copy of the requested range, bounded by `[0, length)`
    SnapshotCopy { store: SnapshotStore, length: u64 },
}

impl ResourceOpenMode {
    /// Absolute `(min, max)` bounds on the resolved handle
    pub fn bounds(&self) -> (u64, u64) {
        match self {
            ResourceOpenMode::DirectReopen {
                physical_offset,
                physical_max,
                ..
            } => (*physical_offset, *physical_max),
            ResourceOpenMode::SnapshotCopy { length, .. } => (0, *length),
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, ResourceOpenMode::SnapshotCopy { .. })
    }
}

/// Resolver for a requested window
#[derive(Debug, Clone)]
pub struct Resolver {
    spill_threshold: u64,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            spill_threshold: DEFAULT_SPILL_THRESHOLD,
        }
    }
}

impl Resolver {
    pub fn new(spill_threshold: u64) -> Self {
        Self { spill_threshold }
    }

    /// Resolve a window on an already open resource
    pub fn resolve(
        &self,
        resource: &mut dyn BackingResource,
        range: ByteRange,
    ) -> Result<ResourceOpenMode> {
        if !resource.is_seekable() {
            return Err(SubstreamError::NotSeekable(
                "can only window seekable resources".to_string(),
            ));
        }

        match resource.origin() {
            ResourceOrigin::Reopenable(path) => self.resolve_path(&path, range),
            ResourceOrigin::Volatile => self.snapshot(resource, range),
        }
    }

    /// Resolve a window on storage named by `path`, opening a fresh handle
    pub fn resolve_path(&self, path: &Path, range: ByteRange) -> Result<ResourceOpenMode> {
        let file = File::open(path).map_err(|e| {
            SubstreamError::ResourceUnavailable(format!(
                "failed to open {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_regular = file.metadata().map(|m| m.is_file()).unwrap_or(false);
        if !is_regular {
            return Err(SubstreamError::NotSeekable(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        debug!(
            "DirectReopen {} for range {} (bounds [{}, {}))",
            path.display(),
            range,
            range.offset(),
            range.end()
        );

        Ok(ResourceOpenMode::DirectReopen {
            path: path.to_path_buf(),
            file,
            physical_offset: range.offset(),
            physical_max: range.end(),
        })
    }

    fn snapshot(
        &self,
        resource: &mut dyn BackingResource,
        range: ByteRange,
    ) -> Result<ResourceOpenMode> {
        let saved = resource
            .stream_position()
            .map_err(|e| SubstreamError::NotSeekable(format!("cannot report position: {}", e)))?;

        let copied = copy_range(resource, range, self.spill_threshold);

        // Restore even when the copy failed; the caller must not see a moved handle
        if let Err(e) = resource.seek(SeekFrom::Start(saved)) {
            warn!("Failed to restore original position {}: {}", saved, e);
            return Err(e.into());
        }

        let (store, copied) = copied?;
        debug!(
            "SnapshotCopy of range {}: copied {} bytes{}",
            range,
            copied,
            if store.is_spilled() { " (spilled)" } else { "" }
        );

        Ok(ResourceOpenMode::SnapshotCopy {
            store,
            length: range.length(),
        })
    }
}

fn copy_range(
    resource: &mut dyn BackingResource,
    range: ByteRange,
    spill_threshold: u64,
) -> Result<(SnapshotStore, u64)> {
    resource.seek(SeekFrom::Start(range.offset()))?;
    let copied = SnapshotStore::copy_from(resource, range.length(), spill_threshold)?;
    Ok(copied)
}

/// Resolve with default settings
pub fn resolve(resource: &mut dyn BackingResource, range: ByteRange) -> Result<ResourceOpenMode> {
    Resolver::default().resolve(resource, range)
}
