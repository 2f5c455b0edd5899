//! Keyed container operations.
//!
//! Dictionaries preserve insertion order; iteration and encoding both
//! honor it. A stream node delegates every keyed operation to its own
//! dictionary, so each of these accepts either kind.

use crate::error::{ObjectError, Result};
use crate::notify::{ChangeContext, ChildKey};
use crate::property::{Property, Value};

impl Property {
    /// Value stored under `key`.
    pub fn get_key(&self, key: &str) -> Result<Property> {
        match &self.0.borrow().value {
            Value::Dict(entries) | Value::Stream { dict: entries, .. } => entries
                .get(key)
                .cloned()
                .ok_or_else(|| ObjectError::NotFound(format!("no entry /{key}"))),
            other => Err(ObjectError::mismatch("dictionary", other.property_type())),
        }
    }

    pub fn has_key(&self, key: &str) -> Result<bool> {
        match &self.0.borrow().value {
            Value::Dict(entries) | Value::Stream { dict: entries, .. } => {
                Ok(entries.contains_key(key))
            }
            other => Err(ObjectError::mismatch("dictionary", other.property_type())),
        }
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Result<Vec<String>> {
        match &self.0.borrow().value {
            Value::Dict(entries) | Value::Stream { dict: entries, .. } => {
                Ok(entries.keys().cloned().collect())
            }
            other => Err(ObjectError::mismatch("dictionary", other.property_type())),
        }
    }

    /// Key/value pairs in insertion order.
    pub fn entries(&self) -> Result<Vec<(String, Property)>> {
        match &self.0.borrow().value {
            Value::Dict(entries) | Value::Stream { dict: entries, .. } => Ok(entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()),
            other => Err(ObjectError::mismatch("dictionary", other.property_type())),
        }
    }

    /// Upserts `key`: replaces the value in place when the key exists
    /// (keeping its position), appends a new entry otherwise. Returns the
    /// displaced value, if any.
    pub fn set_key(&self, key: impl Into<String>, child: Property) -> Result<Option<Property>> {
        self.guard_mutation()?;
        let key = key.into();
        let old = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Dict(entries) | Value::Stream { dict: entries, .. } => {
                    entries.insert(key.clone(), child.clone())
                }
                other => return Err(ObjectError::mismatch("dictionary", other.property_type())),
            }
        };
        if let Some(old) = &old {
            Property::orphan(old);
        }
        self.adopt(&child);
        let context = match &old {
            Some(old) => ChangeContext::child_replaced(ChildKey::Name(key), old.deep_clone()),
            None => ChangeContext::child_added(ChildKey::Name(key)),
        };
        self.publish(&context);
        Ok(old)
    }

    /// Adds a NEW entry; fails without mutating when `key` is already
    /// present.
    pub fn add_key(&self, key: impl Into<String>, child: Property) -> Result<()> {
        self.guard_mutation()?;
        let key = key.into();
        {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Dict(entries) | Value::Stream { dict: entries, .. } => {
                    if entries.contains_key(&key) {
                        return Err(ObjectError::InvalidOperation(format!(
                            "key /{key} already present; use set_key to replace it"
                        )));
                    }
                    entries.insert(key.clone(), child.clone());
                }
                other => return Err(ObjectError::mismatch("dictionary", other.property_type())),
            }
        }
        self.adopt(&child);
        self.publish(&ChangeContext::child_added(ChildKey::Name(key)));
        Ok(())
    }

    /// Removes and returns the value under `key`. Later entries keep
    /// their relative order.
    pub fn remove_key(&self, key: &str) -> Result<Property> {
        self.guard_mutation()?;
        let old = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Dict(entries) | Value::Stream { dict: entries, .. } => entries
                    .shift_remove(key)
                    .ok_or_else(|| ObjectError::NotFound(format!("no entry /{key}")))?,
                other => return Err(ObjectError::mismatch("dictionary", other.property_type())),
            }
        };
        Property::orphan(&old);
        self.publish(&ChangeContext::child_removed(
            ChildKey::Name(key.to_string()),
            old.deep_clone(),
        ));
        Ok(old)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_key_keeps_position_on_replace() {
        let dict = Property::dict();
        dict.set_key("A", Property::int(1)).unwrap();
        dict.set_key("B", Property::int(2)).unwrap();
        dict.set_key("C", Property::int(3)).unwrap();
        let old = dict.set_key("B", Property::int(9)).unwrap().unwrap();
        assert_eq!(old.as_int().unwrap(), 2);
        assert_eq!(dict.keys().unwrap(), ["A", "B", "C"]);
        assert_eq!(dict.get_key("B").unwrap().as_int().unwrap(), 9);
    }

    #[test]
    fn add_key_rejects_duplicate_without_mutating() {
        let dict = Property::dict();
        dict.add_key("K", Property::int(1)).unwrap();
        assert!(matches!(
            dict.add_key("K", Property::int(2)),
            Err(ObjectError::InvalidOperation(_))
        ));
        assert_eq!(dict.get_key("K").unwrap().as_int().unwrap(), 1);
    }

    #[test]
    fn remove_preserves_remaining_order() {
        let dict = Property::dict();
        dict.set_key("A", Property::int(1)).unwrap();
        dict.set_key("B", Property::int(2)).unwrap();
        dict.set_key("C", Property::int(3)).unwrap();
        let removed = dict.remove_key("B").unwrap();
        assert_eq!(removed.as_int().unwrap(), 2);
        assert!(removed.parent().is_none());
        assert_eq!(dict.keys().unwrap(), ["A", "C"]);
    }

    #[test]
    fn missing_key_is_not_found() {
        let dict = Property::dict();
        assert!(matches!(
            dict.get_key("Missing"),
            Err(ObjectError::NotFound(_))
        ));
        assert!(matches!(
            dict.remove_key("Missing"),
            Err(ObjectError::NotFound(_))
        ));
        assert!(!dict.has_key("Missing").unwrap());
    }

    #[test]
    fn stream_delegates_keyed_access() {
        let stream = Property::stream();
        stream.set_key("Type", Property::name("XObject")).unwrap();
        assert!(stream.has_key("Type").unwrap());
        assert!(stream.has_key("Length").unwrap());
        assert_eq!(
            stream.get_key("Type").unwrap().as_name().unwrap(),
            "XObject"
        );
    }

    #[test]
    fn typical_dictionary_round() {
        let dict = Property::dict();
        dict.set_key("Type", Property::name("Example")).unwrap();
        dict.set_key("Count", Property::int(3)).unwrap();
        assert_eq!(dict.child_count().unwrap(), 2);
        assert_eq!(dict.keys().unwrap(), ["Type", "Count"]);
        let entries = dict.entries().unwrap();
        assert_eq!(entries[0].0, "Type");
        assert_eq!(entries[1].1.as_int().unwrap(), 3);
    }
}
