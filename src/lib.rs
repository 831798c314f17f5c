//! substream: read-only, seekable windows onto a byte range of a seekable source
//!
//! A [`Window`] exposes `[offset, offset + length)` of a file or in-memory
//! buffer as its own stream, without disturbing the source. File-backed
//! sources are reopened by path; memory-only sources are copied into a private
//! store first.
//!
//! ```no_run
//! use substream::{MemoryResource, Window};
//!
//! let mut source = MemoryResource::new(b"test string".to_vec());
//! let mut window = Window::from_resource(&mut source, 5, 6)?;
//! assert_eq!(window.read(100)?, b"string");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod locator;
pub mod opener;
pub mod resolver;
pub mod resource;
pub mod snapshot;
pub mod window;

pub use config::{OpenOptions, SeekPolicy};
pub use domain::{ByteRange, ResourceId};
pub use error::{Result, SubstreamError};
pub use locator::{Locator, LocatorTarget, DEFAULT_SCHEME};
pub use opener::{open, Opener};
pub use resolver::{resolve, ResourceOpenMode, Resolver};
pub use resource::{BackingResource, FileResource, MemoryResource, ResourceOrigin, ResourceTable};
pub use window::{Whence, Window, WindowStat};
