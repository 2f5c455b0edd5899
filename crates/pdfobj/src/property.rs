//! The property node: kind tags, the shared node handle, attachment, and
//! the capability contract every value kind implements.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::encode;
use crate::error::{ObjectError, Result};
use crate::notify::{ChangeContext, ChangeObserver};
use crate::resolve::DocumentStore;

/// The closed set of kinds a property can hold.
///
/// A node's kind is fixed at construction and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Null,
    Bool,
    Int,
    Real,
    String,
    Name,
    Ref,
    Array,
    Dict,
    Stream,
}

impl PropertyType {
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::Null => "null",
            PropertyType::Bool => "boolean",
            PropertyType::Int => "integer",
            PropertyType::Real => "real",
            PropertyType::String => "string",
            PropertyType::Name => "name",
            PropertyType::Ref => "reference",
            PropertyType::Array => "array",
            PropertyType::Dict => "dictionary",
            PropertyType::Stream => "stream",
        }
    }
}

/// Identity of an object stored indirectly in the owning document.
/// Equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndirectRef {
    pub num: u32,
    pub gen: u16,
}

impl IndirectRef {
    pub fn new(num: u32, gen: u16) -> IndirectRef {
        IndirectRef { num, gen }
    }
}

/// Tagged payload of a node.
pub(crate) enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    String(Vec<u8>),
    Name(String),
    Ref(IndirectRef),
    Array(Vec<Property>),
    Dict(IndexMap<String, Property>),
    Stream {
        dict: IndexMap<String, Property>,
        raw: Vec<u8>,
    },
}

impl Value {
    pub(crate) fn property_type(&self) -> PropertyType {
        match self {
            Value::Null => PropertyType::Null,
            Value::Bool(_) => PropertyType::Bool,
            Value::Int(_) => PropertyType::Int,
            Value::Real(_) => PropertyType::Real,
            Value::String(_) => PropertyType::String,
            Value::Name(_) => PropertyType::Name,
            Value::Ref(_) => PropertyType::Ref,
            Value::Array(_) => PropertyType::Array,
            Value::Dict(_) => PropertyType::Dict,
            Value::Stream { .. } => PropertyType::Stream,
        }
    }
}

pub(crate) struct Node {
    pub(crate) value: Value,
    /// Weak link to the owning document; absent for detached nodes.
    pub(crate) doc: Option<Weak<dyn DocumentStore>>,
    /// Indirect identity, set while the node (or its indirect ancestor)
    /// is registered with a document.
    pub(crate) self_ref: Option<IndirectRef>,
    /// Back-reference to the holding container; never an ownership edge.
    pub(crate) parent: Weak<RefCell<Node>>,
    pub(crate) observers: Vec<Rc<dyn ChangeObserver>>,
    /// Set while observers are being notified; mutations are rejected
    /// for the duration.
    pub(crate) notifying: bool,
}

/// Handle to a node in the document object model.
///
/// `Clone` duplicates the handle, never the node; both handles address
/// the same live property. Copying a subtree is always the explicit
/// [`Property::deep_clone`] — containers alias mutable children under a
/// shallow copy, and accidental deep copies of large graphs are
/// expensive, so neither happens implicitly.
#[derive(Clone)]
pub struct Property(pub(crate) Rc<RefCell<Node>>);

impl Property {
    pub(crate) fn from_value(value: Value) -> Property {
        let prop = Property(Rc::new(RefCell::new(Node {
            value,
            doc: None,
            self_ref: None,
            parent: Weak::new(),
            observers: Vec::new(),
            notifying: false,
        })));
        for child in prop.direct_children() {
            child.0.borrow_mut().parent = Rc::downgrade(&prop.0);
        }
        prop
    }

    pub fn null() -> Property {
        Self::from_value(Value::Null)
    }

    pub fn bool(value: bool) -> Property {
        Self::from_value(Value::Bool(value))
    }

    pub fn int(value: i64) -> Property {
        Self::from_value(Value::Int(value))
    }

    pub fn real(value: f64) -> Property {
        Self::from_value(Value::Real(value))
    }

    /// Byte string node; embedded NUL bytes are preserved.
    pub fn string(value: impl Into<Vec<u8>>) -> Property {
        Self::from_value(Value::String(value.into()))
    }

    pub fn name(value: impl Into<String>) -> Property {
        Self::from_value(Value::Name(value.into()))
    }

    pub fn reference(target: IndirectRef) -> Property {
        Self::from_value(Value::Ref(target))
    }

    /// Empty array node.
    pub fn array() -> Property {
        Self::from_value(Value::Array(Vec::new()))
    }

    /// Array node taking ownership of `children`. The result is detached;
    /// any prior document context on the children is cleared.
    pub fn array_from(children: Vec<Property>) -> Property {
        let prop = Self::from_value(Value::Array(children));
        prop.detach_from_document();
        prop
    }

    /// Empty dictionary node.
    pub fn dict() -> Property {
        Self::from_value(Value::Dict(IndexMap::new()))
    }

    /// Dictionary node taking ownership of `entries`, preserving their
    /// order. A repeated key silently keeps the later value.
    pub fn dict_from(entries: impl IntoIterator<Item = (String, Property)>) -> Property {
        Self::dict_from_map(entries.into_iter().collect())
    }

    pub(crate) fn dict_from_map(entries: IndexMap<String, Property>) -> Property {
        let prop = Self::from_value(Value::Dict(entries));
        prop.detach_from_document();
        prop
    }

    /// Empty stream node. The required `Length` entry is seeded into the
    /// dictionary immediately.
    pub fn stream() -> Property {
        Self::stream_from(IndexMap::new(), Vec::new())
    }

    pub(crate) fn stream_from(mut dict: IndexMap<String, Property>, raw: Vec<u8>) -> Property {
        dict.insert("Length".to_string(), Property::int(raw.len() as i64));
        let prop = Self::from_value(Value::Stream { dict, raw });
        prop.detach_from_document();
        prop
    }

    /// Kind of this node; never fails and never changes.
    pub fn property_type(&self) -> PropertyType {
        self.0.borrow().value.property_type()
    }

    /// The owning document, while one is alive and this node is attached.
    pub fn document(&self) -> Option<Rc<dyn DocumentStore>> {
        self.0.borrow().doc.as_ref()?.upgrade()
    }

    /// Indirect identity of this node (or of the indirect object it is
    /// nested inside); absent for detached nodes.
    pub fn self_ref(&self) -> Option<IndirectRef> {
        self.0.borrow().self_ref
    }

    /// The container currently holding this node.
    pub fn parent(&self) -> Option<Property> {
        self.0.borrow().parent.upgrade().map(Property)
    }

    /// Whether two handles address the same live node.
    pub fn ptr_eq(&self, other: &Property) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Canonical syntax form of this node, byte-exact (see the codec
    /// table); deterministic for a given value.
    pub fn string_representation(&self) -> Vec<u8> {
        encode::string_representation(self)
    }

    /// Explicit deep copy of this subtree. The copy is detached: no
    /// document link, no indirect identity, no parent, no observers.
    pub fn deep_clone(&self) -> Property {
        let value = {
            let node = self.0.borrow();
            match &node.value {
                Value::Null => Value::Null,
                Value::Bool(v) => Value::Bool(*v),
                Value::Int(v) => Value::Int(*v),
                Value::Real(v) => Value::Real(*v),
                Value::String(v) => Value::String(v.clone()),
                Value::Name(v) => Value::Name(v.clone()),
                Value::Ref(v) => Value::Ref(*v),
                Value::Array(items) => {
                    Value::Array(items.iter().map(Property::deep_clone).collect())
                }
                Value::Dict(entries) => Value::Dict(
                    entries
                        .iter()
                        .map(|(k, v)| (k.clone(), v.deep_clone()))
                        .collect(),
                ),
                Value::Stream { dict, raw } => Value::Stream {
                    dict: dict
                        .iter()
                        .map(|(k, v)| (k.clone(), v.deep_clone()))
                        .collect(),
                    raw: raw.clone(),
                },
            }
        };
        Self::from_value(value)
    }

    // ------------------------------------------------------------------
    // Scalar access
    // ------------------------------------------------------------------

    pub fn as_bool(&self) -> Result<bool> {
        match &self.0.borrow().value {
            Value::Bool(v) => Ok(*v),
            other => Err(ObjectError::mismatch("boolean", other.property_type())),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match &self.0.borrow().value {
            Value::Int(v) => Ok(*v),
            other => Err(ObjectError::mismatch("integer", other.property_type())),
        }
    }

    pub fn as_real(&self) -> Result<f64> {
        match &self.0.borrow().value {
            Value::Real(v) => Ok(*v),
            other => Err(ObjectError::mismatch("real", other.property_type())),
        }
    }

    pub fn as_string_bytes(&self) -> Result<Vec<u8>> {
        match &self.0.borrow().value {
            Value::String(v) => Ok(v.clone()),
            other => Err(ObjectError::mismatch("string", other.property_type())),
        }
    }

    pub fn as_name(&self) -> Result<String> {
        match &self.0.borrow().value {
            Value::Name(v) => Ok(v.clone()),
            other => Err(ObjectError::mismatch("name", other.property_type())),
        }
    }

    pub fn as_reference(&self) -> Result<IndirectRef> {
        match &self.0.borrow().value {
            Value::Ref(v) => Ok(*v),
            other => Err(ObjectError::mismatch("reference", other.property_type())),
        }
    }

    pub fn set_bool(&self, value: bool) -> Result<()> {
        self.guard_mutation()?;
        let before = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Bool(cur) => Property::bool(std::mem::replace(cur, value)),
                other => return Err(ObjectError::mismatch("boolean", other.property_type())),
            }
        };
        self.publish(&ChangeContext::value_changed(before));
        Ok(())
    }

    pub fn set_int(&self, value: i64) -> Result<()> {
        self.guard_mutation()?;
        let before = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Int(cur) => Property::int(std::mem::replace(cur, value)),
                other => return Err(ObjectError::mismatch("integer", other.property_type())),
            }
        };
        self.publish(&ChangeContext::value_changed(before));
        Ok(())
    }

    pub fn set_real(&self, value: f64) -> Result<()> {
        self.guard_mutation()?;
        let before = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Real(cur) => Property::real(std::mem::replace(cur, value)),
                other => return Err(ObjectError::mismatch("real", other.property_type())),
            }
        };
        self.publish(&ChangeContext::value_changed(before));
        Ok(())
    }

    pub fn set_string(&self, value: impl Into<Vec<u8>>) -> Result<()> {
        self.guard_mutation()?;
        let before = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::String(cur) => Property::string(std::mem::replace(cur, value.into())),
                other => return Err(ObjectError::mismatch("string", other.property_type())),
            }
        };
        self.publish(&ChangeContext::value_changed(before));
        Ok(())
    }

    pub fn set_name(&self, value: impl Into<String>) -> Result<()> {
        self.guard_mutation()?;
        let before = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Name(cur) => Property::name(std::mem::replace(cur, value.into())),
                other => return Err(ObjectError::mismatch("name", other.property_type())),
            }
        };
        self.publish(&ChangeContext::value_changed(before));
        Ok(())
    }

    /// Replaces the identifying pair only. The target's existence is not
    /// checked here; that happens lazily on resolution.
    pub fn set_reference(&self, target: IndirectRef) -> Result<()> {
        self.guard_mutation()?;
        let before = {
            let mut node = self.0.borrow_mut();
            match &mut node.value {
                Value::Ref(cur) => Property::reference(std::mem::replace(cur, target)),
                other => return Err(ObjectError::mismatch("reference", other.property_type())),
            }
        };
        self.publish(&ChangeContext::value_changed(before));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------

    /// Number of directly owned children: array elements or dictionary
    /// entries (a stream counts its dictionary's entries).
    pub fn child_count(&self) -> Result<usize> {
        match &self.0.borrow().value {
            Value::Array(items) => Ok(items.len()),
            Value::Dict(entries) | Value::Stream { dict: entries, .. } => Ok(entries.len()),
            other => Err(ObjectError::mismatch(
                "array or dictionary",
                other.property_type(),
            )),
        }
    }

    /// Iterator over the directly owned children, in container order.
    /// Scalars yield nothing. The walk is over a snapshot of the child
    /// handles taken now: re-invoking starts fresh, and mutating the
    /// container during a walk leaves the walk unspecified.
    pub fn children(&self) -> Children {
        Children {
            inner: self.direct_children().into_iter(),
        }
    }

    /// Every transitively owned node, depth-first, in container order.
    /// Indirect references are not followed.
    pub fn descendants(&self) -> Vec<Property> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<Property>) {
        for child in self.direct_children() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    pub(crate) fn direct_children(&self) -> Vec<Property> {
        match &self.0.borrow().value {
            Value::Array(items) => items.clone(),
            Value::Dict(entries) | Value::Stream { dict: entries, .. } => {
                entries.values().cloned().collect()
            }
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Attachment
    // ------------------------------------------------------------------

    /// Attaches this subtree to a document. Every descendant receives the
    /// document link and the SAME indirect identity: children of an
    /// indirect container belong to that container's object, not to one
    /// of their own.
    pub fn attach(&self, doc: &Rc<dyn DocumentStore>, self_ref: IndirectRef) {
        {
            let mut node = self.0.borrow_mut();
            node.doc = Some(Rc::downgrade(doc));
            node.self_ref = Some(self_ref);
        }
        for child in self.direct_children() {
            child.attach(doc, self_ref);
        }
    }

    /// Clears the document link and indirect identity from this subtree.
    pub fn detach_from_document(&self) {
        {
            let mut node = self.0.borrow_mut();
            node.doc = None;
            node.self_ref = None;
        }
        for child in self.direct_children() {
            child.detach_from_document();
        }
    }

    /// Makes `child` this container's; re-parenting propagates the
    /// adopting container's document context to the child's subtree (or
    /// clears it when the container is detached).
    pub(crate) fn adopt(&self, child: &Property) {
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        let context = {
            let node = self.0.borrow();
            node.doc
                .as_ref()
                .and_then(|weak| weak.upgrade())
                .zip(node.self_ref)
        };
        match context {
            Some((doc, self_ref)) => child.attach(&doc, self_ref),
            None => child.detach_from_document(),
        }
    }

    /// Severs a detached child's back-reference and document context.
    pub(crate) fn orphan(child: &Property) {
        child.0.borrow_mut().parent = Weak::new();
        child.detach_from_document();
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Registers an observer; it will be called after every mutation of
    /// this node, in subscription order.
    pub fn subscribe(&self, observer: Rc<dyn ChangeObserver>) {
        self.0.borrow_mut().observers.push(observer);
    }

    /// Removes a previously registered observer handle.
    pub fn unsubscribe(&self, observer: &Rc<dyn ChangeObserver>) -> Result<()> {
        let mut node = self.0.borrow_mut();
        match node
            .observers
            .iter()
            .position(|existing| Rc::ptr_eq(existing, observer))
        {
            Some(index) => {
                node.observers.remove(index);
                Ok(())
            }
            None => Err(ObjectError::NotFound(
                "observer is not subscribed to this node".to_string(),
            )),
        }
    }

    pub(crate) fn guard_mutation(&self) -> Result<()> {
        if self.0.borrow().notifying {
            return Err(ObjectError::InvalidOperation(
                "re-entrant mutation during change notification".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn publish(&self, context: &ChangeContext) {
        let observers = {
            let mut node = self.0.borrow_mut();
            node.notifying = true;
            node.observers.clone()
        };
        for observer in &observers {
            observer.property_changed(context);
        }
        self.0.borrow_mut().notifying = false;
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property")
            .field(&self.property_type())
            .finish()
    }
}

/// Snapshot iterator over a container's children. See
/// [`Property::children`].
pub struct Children {
    inner: std::vec::IntoIter<Property>,
}

impl Iterator for Children {
    type Item = Property;

    fn next(&mut self) -> Option<Property> {
        self.inner.next()
    }
}
