//! Core domain types for windows
//!
//! Type-safe wrappers for resource identifiers and requested byte ranges.
//! Keeping them separate from the resolver and window avoids mixing a resource
//! id with an offset or a length at compile time.

use crate::error::{Result, SubstreamError};

/// Type-safe wrapper for an entry in a [`ResourceTable`](crate::resource::ResourceTable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn new(id: u64) -> Self {
        ResourceId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        ResourceId::new(id)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A requested `[offset, offset + length)` range on a backing resource
///
/// Construction guarantees `offset + length` fits in `u64`, so `end()` never
/// overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    offset: u64,
    length: u64,
}

impl ByteRange {
    pub fn new(offset: u64, length: u64) -> Result<Self> {
        if offset.checked_add(length).is_none() {
            return Err(SubstreamError::InvalidRange {
                offset: offset as i128,
                length: length as i128,
            });
        }
        Ok(ByteRange { offset, length })
    }

    /// Build from signed values, rejecting negatives
    pub fn from_signed(offset: i64, length: i64) -> Result<Self> {
        if offset < 0 || length < 0 {
            return Err(SubstreamError::InvalidRange {
                offset: offset as i128,
                length: length as i128,
            });
        }
        ByteRange::new(offset as u64, length as u64)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn end(&self) -> u64 {
        self.offset + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl std::fmt::Display for ByteRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.offset, self.length)
    }
}
