//! Locator parsing
//!
//! A locator names a window: `scheme://offset:length` optionally followed by
//! `/<resource id>` or `/<path>`. A tail made only of digits is a resource id;
//! anything else is a path (so `scheme://0:10//tmp/data` names `/tmp/data`).
//! An empty tail (`scheme://0:10/`) names no resource, leaving the caller to
//! supply one through [`Opener::with_context`](crate::opener::Opener::with_context).

use crate::domain::{ByteRange, ResourceId};
use crate::error::{Result, SubstreamError};
use std::path::PathBuf;
use std::str::FromStr;

/// Scheme used when none is configured
pub const DEFAULT_SCHEME: &str = "substream";

/// What the tail of a locator refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorTarget {
    /// No inline resource
    None,
    /// Entry in the caller's resource table
    Resource(ResourceId),
    /// Path to open independently
    Path(PathBuf),
}

/// A parsed locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub range: ByteRange,
    pub target: LocatorTarget,
}

impl Locator {
    /// Parse `locator` expecting the given scheme
    pub fn parse(locator: &str, scheme: &str) -> Result<Self> {
        let rest = locator
            .strip_prefix(scheme)
            .and_then(|s| s.strip_prefix("://"))
            .ok_or_else(|| {
                SubstreamError::malformed(locator, format!("expected \"{}://\" prefix", scheme))
            })?;

        let (range_part, tail) = match rest.split_once('/') {
            Some((range_part, tail)) => (range_part, Some(tail)),
            None => (rest, None),
        };

        let (offset, length) = range_part
            .split_once(':')
            .ok_or_else(|| SubstreamError::malformed(locator, "expected offset:length"))?;
        let offset = parse_number(locator, offset)?;
        let length = parse_number(locator, length)?;

        if offset < 0 || length < 0 {
            return Err(SubstreamError::InvalidRange { offset, length });
        }
        let (offset, length) = match (u64::try_from(offset), u64::try_from(length)) {
            (Ok(offset), Ok(length)) => (offset, length),
            _ => return Err(SubstreamError::InvalidRange { offset, length }),
        };
        let range = ByteRange::new(offset, length)?;

        let target = match tail {
            None | Some("") => LocatorTarget::None,
            Some(t) if t.bytes().all(|b| b.is_ascii_digit()) => match t.parse::<u64>() {
                Ok(id) => LocatorTarget::Resource(ResourceId::new(id)),
                Err(_) => {
                    return Err(SubstreamError::malformed(locator, "resource id out of range"))
                }
            },
            Some(t) => LocatorTarget::Path(PathBuf::from(t)),
        };

        Ok(Locator { range, target })
    }

    /// Render back into locator form
    pub fn to_locator_string(&self, scheme: &str) -> String {
        match &self.target {
            LocatorTarget::None => format!("{}://{}", scheme, self.range),
            LocatorTarget::Resource(id) => {
                format!("{}://{}/{}", scheme, self.range, id.as_u64())
            }
            LocatorTarget::Path(path) => {
                format!("{}://{}/{}", scheme, self.range, path.display())
            }
        }
    }
}

impl FromStr for Locator {
    type Err = SubstreamError;

    fn from_str(s: &str) -> Result<Self> {
        Locator::parse(s, DEFAULT_SCHEME)
    }
}

/// Parse an optionally negative decimal, keeping the sign so negatives can be
/// reported as an invalid range rather than a grammar failure
///
/// Values past the `i128` range saturate; they are out of range either way.
fn parse_number(locator: &str, text: &str) -> Result<i128> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubstreamError::malformed(
            locator,
            format!("{:?} is not a number", text),
        ));
    }
    Ok(text.parse::<i128>().unwrap_or(if text.starts_with('-') {
        i128::MIN
    } else {
        i128::MAX
    }))
}
