//! Typed lookup helpers for containers.
//!
//! Each follows one container access with a one-hop resolution and a
//! kind check, the common shape of document-tree walks.

use crate::error::{ObjectError, Result};
use crate::property::{IndirectRef, Property, PropertyType};
use crate::resolve::resolve;

fn resolved_key(dict: &Property, key: &str) -> Result<Property> {
    resolve(&dict.get_key(key)?)
}

fn resolved_index(array: &Property, index: usize) -> Result<Property> {
    resolve(&array.get_index(index)?)
}

/// Checks that `prop` holds `expected`, passing the handle through.
pub fn expect(prop: Property, expected: PropertyType) -> Result<Property> {
    if prop.property_type() == expected {
        Ok(prop)
    } else {
        Err(ObjectError::mismatch(expected.name(), prop.property_type()))
    }
}

pub fn int_from_dict(dict: &Property, key: &str) -> Result<i64> {
    resolved_key(dict, key)?.as_int()
}

pub fn real_from_dict(dict: &Property, key: &str) -> Result<f64> {
    resolved_key(dict, key)?.as_real()
}

pub fn name_from_dict(dict: &Property, key: &str) -> Result<String> {
    resolved_key(dict, key)?.as_name()
}

pub fn string_from_dict(dict: &Property, key: &str) -> Result<Vec<u8>> {
    resolved_key(dict, key)?.as_string_bytes()
}

pub fn ref_from_dict(dict: &Property, key: &str) -> Result<IndirectRef> {
    dict.get_key(key)?.as_reference()
}

pub fn dict_from_dict(dict: &Property, key: &str) -> Result<Property> {
    expect(resolved_key(dict, key)?, PropertyType::Dict)
}

pub fn array_from_dict(dict: &Property, key: &str) -> Result<Property> {
    expect(resolved_key(dict, key)?, PropertyType::Array)
}

pub fn stream_from_dict(dict: &Property, key: &str) -> Result<Property> {
    expect(resolved_key(dict, key)?, PropertyType::Stream)
}

pub fn int_from_array(array: &Property, index: usize) -> Result<i64> {
    resolved_index(array, index)?.as_int()
}

pub fn real_from_array(array: &Property, index: usize) -> Result<f64> {
    resolved_index(array, index)?.as_real()
}

pub fn name_from_array(array: &Property, index: usize) -> Result<String> {
    resolved_index(array, index)?.as_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_values_pass_through() {
        let dict = Property::dict();
        dict.set_key("Count", Property::int(3)).unwrap();
        dict.set_key("Type", Property::name("Example")).unwrap();
        assert_eq!(int_from_dict(&dict, "Count").unwrap(), 3);
        assert_eq!(name_from_dict(&dict, "Type").unwrap(), "Example");
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let dict = Property::dict();
        dict.set_key("Count", Property::int(3)).unwrap();
        assert!(matches!(
            name_from_dict(&dict, "Count"),
            Err(ObjectError::TypeMismatch { .. })
        ));
        assert!(matches!(
            array_from_dict(&dict, "Count"),
            Err(ObjectError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn array_index_helpers() {
        let array = Property::array_from(vec![Property::int(10), Property::name("A")]);
        assert_eq!(int_from_array(&array, 0).unwrap(), 10);
        assert_eq!(name_from_array(&array, 1).unwrap(), "A");
        assert!(matches!(
            int_from_array(&array, 5),
            Err(ObjectError::NotFound(_))
        ));
    }
}
