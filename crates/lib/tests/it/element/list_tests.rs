//! List-operation tests, including the strict index bounds.

use confdata::{Element, ElementError};

use crate::helpers::*;

fn three() -> Element {
    list_of([Element::from(10), Element::from(20), Element::from(30)])
}

#[test]
fn test_get_within_bounds() {
    let list = three();
    assert_eq!(list.get(0).unwrap(), 10);
    assert_eq!(list.get(2).unwrap(), 30);
}

#[test]
fn test_get_at_len_is_out_of_bounds() {
    let list = three();
    assert_eq!(
        list.get(3).unwrap_err(),
        ElementError::IndexOutOfBounds { index: 3, len: 3 }
    );
}

#[test]
fn test_set_replaces_in_place() {
    let list = three();
    list.set(1, Element::from(21)).unwrap();
    assert_eq!(list.get(1).unwrap(), 21);
    assert_eq!(list.len().unwrap(), 3);
}

#[test]
fn test_set_at_len_is_rejected_not_appended() {
    let list = three();
    assert_eq!(
        list.set(3, Element::from(40)).unwrap_err(),
        ElementError::IndexOutOfBounds { index: 3, len: 3 }
    );
    // nothing was written past the end
    assert_eq!(list.len().unwrap(), 3);
}

#[test]
fn test_add_appends() {
    let list = three();
    list.add(Element::from(40)).unwrap();
    assert_eq!(list.len().unwrap(), 4);
    assert_eq!(list.get(3).unwrap(), 40);
}

#[test]
fn test_remove_shifts_and_ignores_out_of_range() {
    let list = three();
    list.remove(1).unwrap();
    assert_eq!(list.len().unwrap(), 2);
    assert_eq!(list.get(1).unwrap(), 30);

    // out-of-range remove is a no-op, not an error
    list.remove(10).unwrap();
    assert_eq!(list.len().unwrap(), 2);
}

#[test]
fn test_is_empty() {
    assert!(Element::new_list().is_empty().unwrap());
    assert!(!three().is_empty().unwrap());
}

#[test]
fn test_list_operations_on_non_list() {
    let map = map_of([("a", Element::from(1))]);
    assert!(map.get(0).unwrap_err().is_type_mismatch());
    assert!(
        map.set(0, Element::from(1))
            .unwrap_err()
            .is_type_mismatch()
    );
    assert!(map.add(Element::from(1)).unwrap_err().is_type_mismatch());
    assert!(map.remove(0).unwrap_err().is_type_mismatch());
    assert!(map.len().unwrap_err().is_type_mismatch());

    let int = Element::from(1);
    assert!(int.get(0).unwrap_err().is_type_mismatch());
    assert!(int.len().unwrap_err().is_type_mismatch());
}
