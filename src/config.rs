//! Configuration for opening windows

use crate::locator::DEFAULT_SCHEME;
use crate::snapshot::DEFAULT_SPILL_THRESHOLD;

/// Which seek targets a window accepts at its upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekPolicy {
    /// Targets must lie in `[min, max)`: the end position is reachable only by
    /// reading to exhaustion
    #[default]
    Strict,
    /// Targets may lie in `[min, max]`, as with ordinary seekable streams
    AllowEnd,
}

impl SeekPolicy {
    /// Whether `candidate` is an acceptable absolute position
    pub fn accepts(&self, candidate: i128, min: u64, max: u64) -> bool {
        let (min, max) = (min as i128, max as i128);
        match self {
            SeekPolicy::Strict => min <= candidate && candidate < max,
            SeekPolicy::AllowEnd => min <= candidate && candidate <= max,
        }
    }
}

/// Options applied when a window is opened
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Locator scheme, without the `://`
    pub scheme: String,
    /// Seek bound behaviour of opened windows
    pub seek_policy: SeekPolicy,
    /// Snapshot copies larger than this many bytes are kept in a temp file
    pub spill_threshold: u64,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            seek_policy: SeekPolicy::Strict,
            spill_threshold: DEFAULT_SPILL_THRESHOLD,
        }
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn seek_policy(mut self, seek_policy: SeekPolicy) -> Self {
        self.seek_policy = seek_policy;
        self
    }

    pub fn spill_threshold(mut self, spill_threshold: u64) -> Self {
        self.spill_threshold = spill_threshold;
        self
    }

    pub fn from_args(matches: &clap::ArgMatches) -> Self {
        let mut options = Self::default();

        if let Some(scheme) = matches.get_one::<String>("scheme") {
            options.scheme = scheme.clone();
        }

        if matches.get_flag("allow-seek-end") {
            options.seek_policy = SeekPolicy::AllowEnd;
        }

        if let Some(&threshold) = matches.get_one::<u64>("spill-threshold") {
            options.spill_threshold = threshold;
        }

        options
    }
}
