//! Opening windows from locators
//!
//! Ties the pieces together: parse the locator, pick the backing resource,
//! resolve it and wrap the result in a [`Window`].
//!
//! Resource selection order:
//! 1. a context resource supplied with [`Opener::with_context`]
//! 2. a resource id in the locator, looked up in the [`ResourceTable`]
//! 3. a path in the locator, opened as a fresh handle

use crate::config::OpenOptions;
use crate::error::{Result, SubstreamError};
use crate::locator::{Locator, LocatorTarget};
use crate::resolver::Resolver;
use crate::resource::{BackingResource, ResourceTable};
use crate::window::Window;
use log::debug;

/// Builder for opening windows
pub struct Opener<'r> {
    options: OpenOptions,
    table: Option<&'r mut ResourceTable>,
    context: Option<&'r mut dyn BackingResource>,
}

impl<'r> Opener<'r> {
    pub fn new(options: OpenOptions) -> Self {
        Opener {
            options,
            table: None,
            context: None,
        }
    }

    /// Resolve resource ids in locators against `table`
    pub fn with_table(mut self, table: &'r mut ResourceTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Use `resource` regardless of any resource named in the locator
    pub fn with_context(mut self, resource: &'r mut dyn BackingResource) -> Self {
        self.context = Some(resource);
        self
    }

    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// Parse `locator` and open the window it names
    pub fn open(&mut self, locator: &str) -> Result<Window> {
        let parsed = Locator::parse(locator, &self.options.scheme)?;
        self.open_locator(&parsed)
    }

    /// Open the window named by an already parsed locator
    pub fn open_locator(&mut self, locator: &Locator) -> Result<Window> {
        let resolver = Resolver::new(self.options.spill_threshold);
        let range = locator.range;

        let mode = if let Some(context) = self.context.as_deref_mut() {
            debug!("Opening {} on context resource", range);
            resolver.resolve(context, range)?
        } else {
            match &locator.target {
                LocatorTarget::Resource(id) => {
                    let resource = self
                        .table
                        .as_deref_mut()
                        .and_then(|table| table.get_mut(*id))
                        .ok_or_else(|| {
                            SubstreamError::ResourceUnavailable(format!("invalid resource {}", id))
                        })?;
                    debug!("Opening {} on resource {}", range, id);
                    resolver.resolve(resource, range)?
                }
                LocatorTarget::Path(path) => {
                    debug!("Opening {} on {}", range, path.display());
                    resolver.resolve_path(path, range)?
                }
                LocatorTarget::None => {
                    return Err(SubstreamError::ResourceUnavailable(
                        "no resource was provided".to_string(),
                    ));
                }
            }
        };

        Ok(Window::new(mode, self.options.seek_policy))
    }
}

impl Default for Opener<'_> {
    fn default() -> Self {
        Opener::new(OpenOptions::default())
    }
}

/// Open `locator` against `table` with default options
pub fn open(locator: &str, table: &mut ResourceTable) -> Result<Window> {
    Opener::default().with_table(table).open(locator)
}
