//! Accessor-protocol tests: the strict surface, the exception-free surface,
//! and the agreement between them.

use confdata::{Element, ElementError};

use crate::helpers::*;

#[test]
fn test_strict_getters_on_matching_kind() {
    assert_eq!(Element::from(42).int_value().unwrap(), 42);
    assert_eq!(Element::from(1.5).real_value().unwrap(), 1.5);
    assert!(Element::from(true).bool_value().unwrap());
    assert_eq!(Element::from("hi").string_value().unwrap(), "hi");

    let list = list_of([Element::from(1), Element::from(2)]);
    assert_eq!(list.list_value().unwrap().len(), 2);

    let map = map_of([("a", Element::from(1))]);
    let entries = map.map_value().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries["a"], 1);
}

#[test]
fn test_strict_getters_report_the_mismatch() {
    let text = Element::from("hello");

    let err = text.int_value().unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.operation(), Some("int_value"));
    let message = format!("{err}");
    assert!(message.contains("int_value"));
    assert!(message.contains("integer"));
    assert!(message.contains("string"));

    let int = Element::from(1);
    assert!(int.real_value().unwrap_err().is_type_mismatch());
    assert!(int.bool_value().unwrap_err().is_type_mismatch());
    assert!(int.string_value().unwrap_err().is_type_mismatch());
    assert!(int.list_value().unwrap_err().is_type_mismatch());
    assert!(int.map_value().unwrap_err().is_type_mismatch());
}

#[test]
fn test_soft_getters_agree_with_strict() {
    let elements = [
        Element::from(42),
        Element::from(1.5),
        Element::from(true),
        Element::from("hi"),
        list_of([Element::from(1)]),
        map_of([("a", Element::from(1))]),
    ];

    for element in &elements {
        assert_eq!(element.as_int(), element.int_value().ok());
        assert_eq!(element.as_real(), element.real_value().ok());
        assert_eq!(element.as_bool(), element.bool_value().ok());
        assert_eq!(element.as_string(), element.string_value().ok());
        assert_eq!(element.as_list().is_some(), element.list_value().is_ok());
        assert_eq!(element.as_map().is_some(), element.map_value().is_ok());
    }

    // Exactly one accessor succeeds per element
    for element in &elements {
        let hits = [
            element.as_int().is_some(),
            element.as_real().is_some(),
            element.as_bool().is_some(),
            element.as_string().is_some(),
            element.as_list().is_some(),
            element.as_map().is_some(),
        ];
        assert_eq!(hits.iter().filter(|hit| **hit).count(), 1);
    }
}

#[test]
fn test_soft_setters_mutate_only_matching_kind() {
    let int = Element::from(1);
    assert!(int.set_int(2));
    assert_eq!(int, 2);
    assert!(!int.set_real(2.5));
    assert!(!int.set_bool(true));
    assert!(!int.set_str("x"));
    assert_eq!(int, 2); // unchanged by the failed setters

    let text = Element::from("old");
    assert!(text.set_str("new"));
    assert_eq!(text, "new");
    assert!(!text.set_int(1));

    let real = Element::from(1.0);
    assert!(real.set_real(0.5));
    assert_eq!(real, 0.5);

    let flag = Element::from(false);
    assert!(flag.set_bool(true));
    assert_eq!(flag, true);

    let list = list_of([Element::from(1)]);
    assert!(list.set_list(vec![Element::from(2), Element::from(3)]));
    assert_eq!(list.len().unwrap(), 2);
    assert!(!list.set_int(1));

    let map = map_of([("a", Element::from(1))]);
    assert!(map.set_map(Default::default()));
    assert!(map.keys().unwrap().is_empty());
    assert!(!map.set_list(Vec::new()));
}

#[test]
fn test_setters_never_retype() {
    let int = Element::from(1);
    assert!(!int.set_str("s"));
    assert!(int.is_int());

    let list = Element::new_list();
    assert!(!list.set_map(Default::default()));
    assert!(list.is_list());
}

#[test]
fn test_try_from_mirrors_strict_getters() {
    let int = Element::from(42);
    assert_eq!(i64::try_from(&int).unwrap(), 42);
    assert!(f64::try_from(&int).unwrap_err().is_type_mismatch());

    let real = Element::from(2.5);
    assert_eq!(f64::try_from(&real).unwrap(), 2.5);

    let flag = Element::from(true);
    assert!(bool::try_from(&flag).unwrap());

    let text = Element::from("hi");
    assert_eq!(String::try_from(&text).unwrap(), "hi");
    assert!(matches!(
        i64::try_from(&text),
        Err(ElementError::TypeMismatch { .. })
    ));
}
