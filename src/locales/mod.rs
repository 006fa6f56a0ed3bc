//! Bundles compiled into the crate.

pub mod es_pr;

use crate::error::L10nResult;
use crate::registry::Registry;

/// A registry holding every embedded bundle.
pub fn registry() -> L10nResult<Registry> {
    let mut registry = Registry::new();
    registry.register(es_pr::bundle()?)?;
    Ok(registry)
}
