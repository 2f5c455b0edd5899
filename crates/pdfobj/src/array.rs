//! Positional container operations.
//!
//! All of these require the node to be an array; calling them on any other
//! kind is a type mismatch. Positions are zero-based, and removals close
//! the gap so later elements shift down by one.

use crate::error::{ObjectError, Result};
use crate::notify::{ChangeContext, ChildKey};
use crate::property::{Property, Value};

impl Property {
    /// Child at `index`.
    pub fn get_index(&self, index: usize) -> Result<Property> {
        match &self.0.borrow().value {
            Value::Array(items) => items.get(index).cloned().ok_or_else(|| {
                ObjectError::NotFound(format!(
                    "index {index} out of bounds for array of {} elements",
                    items.len()
                ))
            }),
            other => Err(ObjectError::mismatch("array", other.property_type())),
        }
    }

    /// Replaces the child at `index`, returning the displaced child. The
    /// old child is detached; the new one is adopted into this array's
    /// document context.
    pub fn set_index(&self, index: usize, child: Property) -> Result<Property> {
        self.guard_mutation()?;
        let old = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Array(items) => {
                    if index >= items.len() {
                        return Err(ObjectError::NotFound(format!(
                            "index {index} out of bounds for array of {} elements",
                            items.len()
                        )));
                    }
                    std::mem::replace(&mut items[index], child.clone())
                }
                other => return Err(ObjectError::mismatch("array", other.property_type())),
            }
        };
        Property::orphan(&old);
        self.adopt(&child);
        self.publish(&ChangeContext::child_replaced(
            ChildKey::Index(index),
            old.deep_clone(),
        ));
        Ok(old)
    }

    /// Inserts `child` at `index`, shifting later elements up by one.
    /// `index` may equal the current length to append.
    pub fn insert_index(&self, index: usize, child: Property) -> Result<()> {
        self.guard_mutation()?;
        {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Array(items) => {
                    if index > items.len() {
                        return Err(ObjectError::NotFound(format!(
                            "insertion index {index} out of bounds for array of {} elements",
                            items.len()
                        )));
                    }
                    items.insert(index, child.clone());
                }
                other => return Err(ObjectError::mismatch("array", other.property_type())),
            }
        }
        self.adopt(&child);
        self.publish(&ChangeContext::child_added(ChildKey::Index(index)));
        Ok(())
    }

    /// Appends `child` to the end of the array.
    pub fn push(&self, child: Property) -> Result<()> {
        let len = self.child_count()?;
        self.insert_index(len, child)
    }

    /// Removes and returns the child at `index`; later elements shift
    /// down by one.
    pub fn remove_index(&self, index: usize) -> Result<Property> {
        self.guard_mutation()?;
        let old = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Array(items) => {
                    if index >= items.len() {
                        return Err(ObjectError::NotFound(format!(
                            "index {index} out of bounds for array of {} elements",
                            items.len()
                        )));
                    }
                    items.remove(index)
                }
                other => return Err(ObjectError::mismatch("array", other.property_type())),
            }
        };
        Property::orphan(&old);
        self.publish(&ChangeContext::child_removed(
            ChildKey::Index(index),
            old.deep_clone(),
        ));
        Ok(old)
    }
}
