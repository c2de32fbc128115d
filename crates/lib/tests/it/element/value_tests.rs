//! Value-model tests: kinds, factories, equality, and handle semantics.

use std::collections::BTreeMap;

use confdata::{Element, Kind};

use crate::helpers::*;

#[test]
fn test_factory_kinds() {
    assert_eq!(Element::from(42).kind(), Kind::Int);
    assert_eq!(Element::from(42i64).kind(), Kind::Int);
    assert_eq!(Element::from(1.5).kind(), Kind::Real);
    assert_eq!(Element::from(true).kind(), Kind::Bool);
    assert_eq!(Element::from("hello").kind(), Kind::Str);
    assert_eq!(Element::from(String::from("hello")).kind(), Kind::Str);
    assert_eq!(Element::from(Vec::<Element>::new()).kind(), Kind::List);
    assert_eq!(
        Element::from(BTreeMap::<String, Element>::new()).kind(),
        Kind::Map
    );
    assert_eq!(Element::new_list().kind(), Kind::List);
    assert_eq!(Element::new_map().kind(), Kind::Map);
}

#[test]
fn test_type_names() {
    assert_eq!(Element::from(42).type_name(), "integer");
    assert_eq!(Element::from(1.5).type_name(), "real");
    assert_eq!(Element::from(true).type_name(), "boolean");
    assert_eq!(Element::from("x").type_name(), "string");
    assert_eq!(Element::new_list().type_name(), "list");
    assert_eq!(Element::new_map().type_name(), "map");
}

#[test]
fn test_kind_predicates() {
    let int = Element::from(1);
    assert!(int.is_int());
    assert!(!int.is_real());
    assert!(!int.is_bool());
    assert!(!int.is_str());
    assert!(!int.is_list());
    assert!(!int.is_map());

    assert!(Element::from(0.5).is_real());
    assert!(Element::from(false).is_bool());
    assert!(Element::from("s").is_str());
    assert!(Element::new_list().is_list());
    assert!(Element::new_map().is_map());
}

#[test]
fn test_scalar_comparisons() {
    let int = Element::from(42);
    let real = Element::from(2.5);
    let flag = Element::from(true);
    let text = Element::from("hello");

    // Direct comparison with plain values
    assert!(int == 42);
    assert!(real == 2.5);
    assert!(flag == true);
    assert!(text == "hello");

    // Reverse comparisons also work
    assert!(42 == int);
    assert!(2.5 == real);
    assert!(true == flag);
    assert!("hello" == text);

    // Kind mismatches compare unequal
    assert!(!(int == 1.5));
    assert!(!(text == 42));
    assert!(!(flag == false));
}

#[test]
fn test_structural_equality() {
    let a = sample_config();
    let b = sample_config();
    assert_eq!(a, b);

    // Same shape, one leaf differs
    let c = sample_config();
    assert!(c.find("server/timeout").unwrap().unwrap().set_int(31));
    assert_ne!(a, c);

    // Kind matters even when the rendered value looks alike
    assert_ne!(Element::from(1), Element::from(1.0));

    // Key sets matter
    let m1 = map_of([("a", Element::from(1))]);
    let m2 = map_of([("a", Element::from(1)), ("b", Element::from(2))]);
    assert_ne!(m1, m2);

    // List order matters
    let l1 = list_of([Element::from(1), Element::from(2)]);
    let l2 = list_of([Element::from(2), Element::from(1)]);
    assert_ne!(l1, l2);
}

#[test]
fn test_handles_alias_the_tree() {
    let root = sample_config();
    let server = root.find("server").unwrap().unwrap();

    // Mutation through the found handle is visible through the root
    server
        .set_key("timeout", Element::from(99))
        .expect("server is a map");
    assert_eq!(root.find("server/timeout").unwrap().unwrap(), 99);

    // And through scalar setters on a leaf handle
    let timeout = root.find("server/timeout").unwrap().unwrap();
    assert!(timeout.set_int(7));
    assert_eq!(root.find("server/timeout").unwrap().unwrap(), 7);
}

#[test]
fn test_clone_is_a_handle_deep_clone_is_a_copy() {
    let original = sample_config();

    let alias = original.clone();
    assert!(alias.ptr_eq(&original));
    assert_eq!(alias, original);

    let copy = original.deep_clone();
    assert!(!copy.ptr_eq(&original));
    assert_eq!(copy, original);

    // Mutating the copy leaves the original untouched
    copy.set_key("version", Element::from(4)).unwrap();
    assert_eq!(original.get_key("version").unwrap().unwrap(), 3);
    assert_eq!(copy.get_key("version").unwrap().unwrap(), 4);
}

#[test]
fn test_shared_child_in_two_positions() {
    let shared = Element::from(1);
    let list = list_of([shared.clone(), shared.clone()]);

    assert!(shared.set_int(5));
    assert_eq!(list.get(0).unwrap(), 5);
    assert_eq!(list.get(1).unwrap(), 5);
}
