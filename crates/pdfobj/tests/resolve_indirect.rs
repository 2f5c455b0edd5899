use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pdfobj::helpers;
use pdfobj::{
    decode_attached, resolve, DocumentStore, IndirectRef, ObjectError, Property, RawToken,
};

#[derive(Default)]
struct MemStore {
    objects: RefCell<HashMap<IndirectRef, Property>>,
    attached: std::cell::Cell<bool>,
}

impl MemStore {
    fn new() -> Rc<MemStore> {
        let store = Rc::new(MemStore::default());
        store.attached.set(true);
        store
    }

    fn insert(self: &Rc<Self>, target: IndirectRef, prop: Property) {
        let doc: Rc<dyn DocumentStore> = self.clone();
        prop.attach(&doc, target);
        self.objects.borrow_mut().insert(target, prop);
    }
}

impl DocumentStore for MemStore {
    fn resolve_indirect(&self, target: IndirectRef) -> pdfobj::Result<Property> {
        self.objects
            .borrow()
            .get(&target)
            .cloned()
            .ok_or_else(|| {
                ObjectError::NotFound(format!("no object {} {}", target.num, target.gen))
            })
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }
}

#[test]
fn reference_resolves_through_the_store() {
    let store = MemStore::new();
    store.insert(IndirectRef::new(1, 0), Property::int(42));

    let holder = Property::dict();
    let doc: Rc<dyn DocumentStore> = store.clone();
    holder.attach(&doc, IndirectRef::new(2, 0));
    holder
        .set_key("Target", Property::reference(IndirectRef::new(1, 0)))
        .unwrap();

    let resolved = resolve(&holder.get_key("Target").unwrap()).unwrap();
    assert_eq!(resolved.as_int().unwrap(), 42);
}

#[test]
fn resolution_is_one_hop() {
    let store = MemStore::new();
    store.insert(
        IndirectRef::new(1, 0),
        Property::reference(IndirectRef::new(2, 0)),
    );
    store.insert(IndirectRef::new(2, 0), Property::name("End"));

    let start = Property::reference(IndirectRef::new(1, 0));
    let doc: Rc<dyn DocumentStore> = store.clone();
    start.attach(&doc, IndirectRef::new(3, 0));

    let hop = resolve(&start).unwrap();
    assert!(hop.as_reference().is_ok());
    let end = resolve(&hop).unwrap();
    assert_eq!(end.as_name().unwrap(), "End");
}

#[test]
fn unknown_target_is_not_found() {
    let store = MemStore::new();
    let node = Property::reference(IndirectRef::new(77, 0));
    let doc: Rc<dyn DocumentStore> = store.clone();
    node.attach(&doc, IndirectRef::new(1, 0));
    assert!(matches!(resolve(&node), Err(ObjectError::NotFound(_))));
}

#[test]
fn store_without_index_rejects_resolution() {
    let store = Rc::new(MemStore::default());
    let node = Property::reference(IndirectRef::new(1, 0));
    let doc: Rc<dyn DocumentStore> = store.clone();
    node.attach(&doc, IndirectRef::new(2, 0));
    assert!(matches!(
        resolve(&node),
        Err(ObjectError::InvalidOperation(_))
    ));
}

#[test]
fn resolution_sees_later_mutations() {
    let store = MemStore::new();
    let target = Property::int(1);
    store.insert(IndirectRef::new(1, 0), target.clone());

    let node = Property::reference(IndirectRef::new(1, 0));
    let doc: Rc<dyn DocumentStore> = store.clone();
    node.attach(&doc, IndirectRef::new(2, 0));

    assert_eq!(resolve(&node).unwrap().as_int().unwrap(), 1);
    target.set_int(2).unwrap();
    assert_eq!(resolve(&node).unwrap().as_int().unwrap(), 2);
}

#[test]
fn adoption_propagates_document_context() {
    let store = MemStore::new();
    store.insert(IndirectRef::new(1, 0), Property::bool(true));

    let root = Property::dict();
    let doc: Rc<dyn DocumentStore> = store.clone();
    root.attach(&doc, IndirectRef::new(5, 0));

    let child = Property::reference(IndirectRef::new(1, 0));
    assert!(resolve(&child).is_err());
    root.set_key("Link", child.clone()).unwrap();
    assert_eq!(child.self_ref().unwrap(), IndirectRef::new(5, 0));
    assert!(resolve(&child).unwrap().as_bool().unwrap());

    root.remove_key("Link").unwrap();
    assert!(child.document().is_none());
    assert!(resolve(&child).is_err());
}

#[test]
fn decode_attached_registers_identity() {
    let store = MemStore::new();
    let doc: Rc<dyn DocumentStore> = store.clone();
    let token = RawToken::Dict(vec![("Count".into(), RawToken::Int(3))]);
    let prop = decode_attached(&token, &doc, IndirectRef::new(9, 1)).unwrap();
    assert_eq!(prop.self_ref().unwrap(), IndirectRef::new(9, 1));
    assert_eq!(
        prop.get_key("Count").unwrap().self_ref().unwrap(),
        IndirectRef::new(9, 1)
    );
}

#[test]
fn decode_attached_names_the_failing_object() {
    let store = MemStore::new();
    let doc: Rc<dyn DocumentStore> = store.clone();
    let token = RawToken::Stream {
        dict: vec![("Length".into(), RawToken::Int(9))],
        data: Some(b"short".to_vec()),
    };
    let err = decode_attached(&token, &doc, IndirectRef::new(6, 2)).unwrap_err();
    match err {
        ObjectError::DecodeFailed { num, gen, .. } => {
            assert_eq!((num, gen), (6, 2));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn typed_helpers_resolve_on_the_way() {
    let store = MemStore::new();
    store.insert(IndirectRef::new(1, 0), Property::int(10));

    let dict = Property::dict();
    let doc: Rc<dyn DocumentStore> = store.clone();
    dict.attach(&doc, IndirectRef::new(2, 0));
    dict.set_key("Direct", Property::int(5)).unwrap();
    dict.set_key("Linked", Property::reference(IndirectRef::new(1, 0)))
        .unwrap();

    assert_eq!(helpers::int_from_dict(&dict, "Direct").unwrap(), 5);
    assert_eq!(helpers::int_from_dict(&dict, "Linked").unwrap(), 10);
    assert_eq!(
        helpers::ref_from_dict(&dict, "Linked").unwrap(),
        IndirectRef::new(1, 0)
    );
}
