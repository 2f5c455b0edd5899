//! Stream node: raw buffer access and the filter pipeline.
//!
//! A stream carries its dictionary plus an opaque byte buffer. The
//! dictionary's `Length` entry always equals the raw buffer's size; every
//! buffer mutation rewrites it in the same step. The optional `Filter`
//! entry names the transforms the buffer is encoded under, outermost
//! first: decoding applies them in declared order, encoding in reverse.

use pdfobj_filters::Filter;

use crate::encode;
use crate::error::{ObjectError, Result};
use crate::notify::ChangeContext;
use crate::property::{Property, Value};

impl Property {
    /// The stored (still encoded) buffer, verbatim.
    pub fn raw_buffer(&self) -> Result<Vec<u8>> {
        match &self.0.borrow().value {
            Value::Stream { raw, .. } => Ok(raw.clone()),
            other => Err(ObjectError::mismatch("stream", other.property_type())),
        }
    }

    /// Filter names declared by the dictionary, in application order.
    /// A missing `Filter` entry means no transform; a single name or an
    /// array of names are both accepted.
    pub fn filter_names(&self) -> Result<Vec<String>> {
        if self.property_type() != crate::property::PropertyType::Stream {
            return Err(ObjectError::mismatch("stream", self.property_type()));
        }
        let filter = match self.get_key("Filter") {
            Ok(filter) => filter,
            Err(ObjectError::NotFound(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let names = match &filter.0.borrow().value {
            Value::Name(name) => Ok(vec![name.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_name().map_err(|_| {
                        ObjectError::mismatch("name or array of names", item.property_type())
                    })
                })
                .collect(),
            other => Err(ObjectError::mismatch(
                "name or array of names",
                other.property_type(),
            )),
        };
        names
    }

    /// The buffer with every declared filter undone, in declared order.
    /// Computed on each call; nothing is cached.
    pub fn decoded_payload(&self) -> Result<Vec<u8>> {
        let names = self.filter_names()?;
        let mut data = self.raw_buffer()?;
        for name in &names {
            let filter = Filter::from_name(name)
                .ok_or_else(|| ObjectError::UnsupportedFilter(name.clone()))?;
            data = filter.decode(&data)?;
        }
        Ok(data)
    }

    /// Replaces the encoded buffer verbatim. No filter runs; the caller
    /// asserts the bytes already match the declared filters. `Length` is
    /// rewritten in the same step.
    pub fn set_raw_buffer(&self, data: impl Into<Vec<u8>>) -> Result<()> {
        self.guard_mutation()?;
        if self.property_type() != crate::property::PropertyType::Stream {
            return Err(ObjectError::mismatch("stream", self.property_type()));
        }
        let before = self.deep_clone();
        let data = data.into();
        let len = data.len();
        {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Stream { raw, .. } => *raw = data,
                other => return Err(ObjectError::mismatch("stream", other.property_type())),
            }
        }
        self.sync_length(len);
        self.publish(&ChangeContext::buffer_changed(before));
        Ok(())
    }

    /// Takes plain payload bytes, runs the declared filters in reverse
    /// order, and stores the result.
    ///
    /// When the pipeline names a filter this codec cannot produce, the
    /// stream falls back to storing the payload unfiltered: the `Filter`
    /// entry is dropped so the dictionary stays consistent with the
    /// buffer, and the operation still succeeds.
    pub fn set_decoded_payload(&self, payload: impl Into<Vec<u8>>) -> Result<()> {
        self.guard_mutation()?;
        let names = self.filter_names()?;
        let mut pipeline = Vec::with_capacity(names.len());
        let mut unsupported = None;
        for name in &names {
            match Filter::from_name(name) {
                Some(filter) => pipeline.push(filter),
                None => {
                    unsupported = Some(name.clone());
                    break;
                }
            }
        }

        let payload = payload.into();
        let before = self.deep_clone();

        let data = if let Some(name) = unsupported {
            tracing::warn!(filter = %name, "unsupported stream filter, storing payload unfiltered");
            let old_filter = {
                let mut node = self.0.borrow_mut();
                match &mut node.value {
                    Value::Stream { dict, .. } => dict.shift_remove("Filter"),
                    other => return Err(ObjectError::mismatch("stream", other.property_type())),
                }
            };
            if let Some(old_filter) = old_filter {
                Property::orphan(&old_filter);
            }
            payload
        } else {
            let mut data = payload;
            for filter in pipeline.iter().rev() {
                data = filter.encode(&data)?;
            }
            data
        };

        let len = data.len();
        {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Stream { raw, .. } => *raw = data,
                other => return Err(ObjectError::mismatch("stream", other.property_type())),
            }
        }
        self.sync_length(len);
        self.publish(&ChangeContext::buffer_changed(before));
        Ok(())
    }

    /// Canonical form of the stream with the DECODED payload in place of
    /// the raw buffer, for display and diffing. `Length` in the emitted
    /// dictionary still reflects the raw buffer.
    pub fn decoded_string_representation(&self) -> Result<Vec<u8>> {
        let payload = self.decoded_payload()?;
        Ok(encode::stream_representation(self, &payload))
    }

    /// Rewrites the `Length` entry directly, without a notification of
    /// its own; the enclosing buffer mutation publishes one event for
    /// both.
    fn sync_length(&self, len: usize) {
        let length = Property::int(len as i64);
        let old = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Stream { dict, .. } => dict.insert("Length".to_string(), length.clone()),
                _ => return,
            }
        };
        if let Some(old) = old {
            Property::orphan(&old);
        }
        self.adopt(&length);
    }
}
