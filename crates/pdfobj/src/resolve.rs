//! Reference resolution against the owning document.
//!
//! The model never follows references on its own; every hop is an
//! explicit call here, and cycles are the caller's concern.

use std::rc::Rc;

use crate::error::{ObjectError, Result};
use crate::property::{IndirectRef, Property, PropertyType};

/// Object index the model resolves references through. Implemented by
/// the enclosing document layer.
pub trait DocumentStore {
    /// Looks up the object stored under `target`. Unknown ids are
    /// `NotFound`.
    fn resolve_indirect(&self, target: IndirectRef) -> Result<Property>;

    /// Whether this store currently has a usable object index.
    fn is_attached(&self) -> bool;
}

/// Follows `prop` one hop when it is a reference; any other kind is
/// returned unchanged. Each call performs a fresh lookup.
pub fn resolve(prop: &Property) -> Result<Property> {
    if prop.property_type() != PropertyType::Ref {
        return Ok(prop.clone());
    }
    let target = prop.as_reference()?;
    let doc: Rc<dyn DocumentStore> = prop.document().ok_or_else(|| {
        ObjectError::InvalidOperation(
            "cannot resolve a reference detached from any document".to_string(),
        )
    })?;
    if !doc.is_attached() {
        return Err(ObjectError::InvalidOperation(
            "owning document has no object index".to_string(),
        ));
    }
    doc.resolve_indirect(target)
}
