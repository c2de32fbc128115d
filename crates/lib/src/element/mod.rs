//! The recursive data element at the heart of the control channel.
//!
//! Configuration and command data travels between cooperating processes as
//! trees of [`Element`] values. An element carries exactly one of six kinds:
//! four scalars (integer, real, boolean, string) and two composites (list,
//! map). Composites nest arbitrarily; a map's keys are unique and iterate in
//! sorted order.
//!
//! # Handles
//!
//! An `Element` is a cheap shared handle (`Rc<RefCell<..>>`) onto a node, not
//! the node itself. Cloning a handle never copies the tree, and a subtree
//! handle returned by [`Element::find`] stays valid while the owning tree is
//! alive. Mutation through any handle is visible through every alias; use
//! [`Element::deep_clone`] to detach a private copy. The tree is
//! single-threaded by construction (`Rc` is not `Send`); the embedding
//! process owns any cross-thread coordination.
//!
//! Callers must not link a composite into its own descendants: the model has
//! no cycle check, and a cyclic tree would render and encode forever.
//!
//! # Accessor surfaces
//!
//! Every operation exists in a strict form that reports
//! [`ElementError::TypeMismatch`] when invoked on the wrong kind, and an
//! exception-free form (`as_*`, `set_*`, [`Element::find_opt`]) that folds
//! failure into `Option`/`bool`. Callers handling heterogeneous input should
//! prefer the exception-free surface.
//!
//! ```
//! use confdata::Element;
//!
//! let cfg = Element::from_text(r#"{"server": {"port": 53, "tcp": true}}"#)?;
//! assert_eq!(cfg.find("server/port")?.unwrap().int_value()?, 53);
//! assert_eq!(cfg.find("server/nope")?, None);
//! # Ok::<(), confdata::Error>(())
//! ```

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

pub mod errors;

pub use errors::ElementError;

/// The six kinds of element.
///
/// The kind of an element is fixed at construction; there is no in-place
/// retyping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Real,
    Bool,
    Str,
    List,
    Map,
}

impl Kind {
    /// Returns the kind name as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Int => "integer",
            Kind::Real => "real",
            Kind::Bool => "boolean",
            Kind::Str => "string",
            Kind::List => "list",
            Kind::Map => "map",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage for a single node. Private; reached only through [`Element`].
#[derive(Debug)]
pub(crate) enum Payload {
    Int(i64),
    Real(f64),
    Bool(bool),
    Str(String),
    List(Vec<Element>),
    Map(BTreeMap<String, Element>),
}

impl Payload {
    pub(crate) fn kind(&self) -> Kind {
        match self {
            Payload::Int(_) => Kind::Int,
            Payload::Real(_) => Kind::Real,
            Payload::Bool(_) => Kind::Bool,
            Payload::Str(_) => Kind::Str,
            Payload::List(_) => Kind::List,
            Payload::Map(_) => Kind::Map,
        }
    }
}

/// A shared handle to a node in an element tree.
///
/// Construct elements with the `From` impls ([`i64`], [`f64`], [`bool`],
/// `&str`, [`String`], `Vec<Element>`, `BTreeMap<String, Element>`), with
/// [`Element::new_list`] / [`Element::new_map`], or through the text and wire
/// codecs. The "no value" result of a lookup is `Option::<Element>::None`,
/// not a distinct null kind.
///
/// ```
/// use confdata::{Element, Kind};
///
/// let list = Element::new_list();
/// list.add(Element::from(1))?;
/// list.add(Element::from("two"))?;
/// assert_eq!(list.kind(), Kind::List);
/// assert_eq!(list.len()?, 2);
/// assert_eq!(list.get(0)?, 1);
/// # Ok::<(), confdata::Error>(())
/// ```
#[derive(Clone)]
pub struct Element {
    pub(crate) inner: Rc<RefCell<Payload>>,
}

impl Element {
    fn new(payload: Payload) -> Self {
        Self {
            inner: Rc::new(RefCell::new(payload)),
        }
    }

    /// Creates an empty list element.
    pub fn new_list() -> Self {
        Self::new(Payload::List(Vec::new()))
    }

    /// Creates an empty map element.
    pub fn new_map() -> Self {
        Self::new(Payload::Map(BTreeMap::new()))
    }

    /// Returns the kind of this element.
    pub fn kind(&self) -> Kind {
        self.inner.borrow().kind()
    }

    /// Returns the kind name as a string.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns true if this is an integer element.
    pub fn is_int(&self) -> bool {
        self.kind() == Kind::Int
    }

    /// Returns true if this is a real element.
    pub fn is_real(&self) -> bool {
        self.kind() == Kind::Real
    }

    /// Returns true if this is a boolean element.
    pub fn is_bool(&self) -> bool {
        self.kind() == Kind::Bool
    }

    /// Returns true if this is a string element.
    pub fn is_str(&self) -> bool {
        self.kind() == Kind::Str
    }

    /// Returns true if this is a list element.
    pub fn is_list(&self) -> bool {
        self.kind() == Kind::List
    }

    /// Returns true if this is a map element.
    pub fn is_map(&self) -> bool {
        self.kind() == Kind::Map
    }

    /// Returns true if both handles refer to the same node.
    ///
    /// Distinct from `==`, which compares structurally.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a detached copy of the whole subtree.
    ///
    /// The copy shares no nodes with the original, so later mutation on
    /// either side is invisible to the other.
    pub fn deep_clone(&self) -> Element {
        match &*self.inner.borrow() {
            Payload::Int(v) => Element::from(*v),
            Payload::Real(v) => Element::from(*v),
            Payload::Bool(v) => Element::from(*v),
            Payload::Str(s) => Element::from(s.clone()),
            Payload::List(items) => {
                Element::from(items.iter().map(Element::deep_clone).collect::<Vec<_>>())
            }
            Payload::Map(entries) => Element::from(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_clone()))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }

    // ---- strict getters ----
    //
    // Each is valid only on its own kind and reports TypeMismatch otherwise.
    // The exception-free counterparts are the as_* methods below.

    /// Returns the integer payload.
    pub fn int_value(&self) -> Result<i64, ElementError> {
        match &*self.inner.borrow() {
            Payload::Int(v) => Ok(*v),
            other => Err(ElementError::mismatch("int_value", Kind::Int, other.kind())),
        }
    }

    /// Returns the real payload.
    pub fn real_value(&self) -> Result<f64, ElementError> {
        match &*self.inner.borrow() {
            Payload::Real(v) => Ok(*v),
            other => Err(ElementError::mismatch("real_value", Kind::Real, other.kind())),
        }
    }

    /// Returns the boolean payload.
    pub fn bool_value(&self) -> Result<bool, ElementError> {
        match &*self.inner.borrow() {
            Payload::Bool(v) => Ok(*v),
            other => Err(ElementError::mismatch("bool_value", Kind::Bool, other.kind())),
        }
    }

    /// Returns a copy of the string payload.
    pub fn string_value(&self) -> Result<String, ElementError> {
        match &*self.inner.borrow() {
            Payload::Str(s) => Ok(s.clone()),
            other => Err(ElementError::mismatch("string_value", Kind::Str, other.kind())),
        }
    }

    /// Returns the list items as a vector of handles.
    ///
    /// The handles alias the children; only the vector itself is a copy.
    pub fn list_value(&self) -> Result<Vec<Element>, ElementError> {
        match &*self.inner.borrow() {
            Payload::List(items) => Ok(items.clone()),
            other => Err(ElementError::mismatch("list_value", Kind::List, other.kind())),
        }
    }

    /// Returns the map entries as a key-sorted map of handles.
    ///
    /// The handles alias the children; only the map itself is a copy.
    pub fn map_value(&self) -> Result<BTreeMap<String, Element>, ElementError> {
        match &*self.inner.borrow() {
            Payload::Map(entries) => Ok(entries.clone()),
            other => Err(ElementError::mismatch("map_value", Kind::Map, other.kind())),
        }
    }

    // ---- exception-free getters ----

    /// Attempts to read this element as an integer.
    pub fn as_int(&self) -> Option<i64> {
        self.int_value().ok()
    }

    /// Attempts to read this element as a real.
    pub fn as_real(&self) -> Option<f64> {
        self.real_value().ok()
    }

    /// Attempts to read this element as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        self.bool_value().ok()
    }

    /// Attempts to read this element as a string.
    pub fn as_string(&self) -> Option<String> {
        self.string_value().ok()
    }

    /// Attempts to read this element as a list of handles.
    pub fn as_list(&self) -> Option<Vec<Element>> {
        self.list_value().ok()
    }

    /// Attempts to read this element as a map of handles.
    pub fn as_map(&self) -> Option<BTreeMap<String, Element>> {
        self.map_value().ok()
    }

    // ---- exception-free setters ----
    //
    // Replace the payload in place when the kind matches and report whether
    // they did; the kind tag itself never changes.

    /// Replaces the integer payload. Returns false on any other kind.
    pub fn set_int(&self, value: i64) -> bool {
        match &mut *self.inner.borrow_mut() {
            Payload::Int(v) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Replaces the real payload. Returns false on any other kind.
    pub fn set_real(&self, value: f64) -> bool {
        match &mut *self.inner.borrow_mut() {
            Payload::Real(v) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Replaces the boolean payload. Returns false on any other kind.
    pub fn set_bool(&self, value: bool) -> bool {
        match &mut *self.inner.borrow_mut() {
            Payload::Bool(v) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Replaces the string payload. Returns false on any other kind.
    pub fn set_str(&self, value: impl Into<String>) -> bool {
        match &mut *self.inner.borrow_mut() {
            Payload::Str(s) => {
                *s = value.into();
                true
            }
            _ => false,
        }
    }

    /// Replaces the list items. Returns false on any other kind.
    pub fn set_list(&self, items: Vec<Element>) -> bool {
        match &mut *self.inner.borrow_mut() {
            Payload::List(l) => {
                *l = items;
                true
            }
            _ => false,
        }
    }

    /// Replaces the map entries. Returns false on any other kind.
    pub fn set_map(&self, entries: BTreeMap<String, Element>) -> bool {
        match &mut *self.inner.borrow_mut() {
            Payload::Map(m) => {
                *m = entries;
                true
            }
            _ => false,
        }
    }

    // ---- list operations ----

    /// Returns the handle at `index`.
    ///
    /// Reports [`ElementError::IndexOutOfBounds`] for `index >= len` and
    /// [`ElementError::TypeMismatch`] on a non-list element.
    pub fn get(&self, index: usize) -> Result<Element, ElementError> {
        match &*self.inner.borrow() {
            Payload::List(items) => {
                items
                    .get(index)
                    .cloned()
                    .ok_or(ElementError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    })
            }
            other => Err(ElementError::mismatch("get", Kind::List, other.kind())),
        }
    }

    /// Replaces the handle at `index`.
    ///
    /// The index must be strictly below the current length; `index == len` is
    /// rejected with [`ElementError::IndexOutOfBounds`], never treated as an
    /// append. Use [`Element::add`] to append.
    pub fn set(&self, index: usize, element: Element) -> Result<(), ElementError> {
        match &mut *self.inner.borrow_mut() {
            Payload::List(items) => {
                if index < items.len() {
                    items[index] = element;
                    Ok(())
                } else {
                    Err(ElementError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    })
                }
            }
            other => Err(ElementError::mismatch("set", Kind::List, other.kind())),
        }
    }

    /// Appends a handle to the list.
    pub fn add(&self, element: Element) -> Result<(), ElementError> {
        match &mut *self.inner.borrow_mut() {
            Payload::List(items) => {
                items.push(element);
                Ok(())
            }
            other => Err(ElementError::mismatch("add", Kind::List, other.kind())),
        }
    }

    /// Removes the handle at `index`. Out-of-range indices are a no-op.
    pub fn remove(&self, index: usize) -> Result<(), ElementError> {
        match &mut *self.inner.borrow_mut() {
            Payload::List(items) => {
                if index < items.len() {
                    items.remove(index);
                }
                Ok(())
            }
            other => Err(ElementError::mismatch("remove", Kind::List, other.kind())),
        }
    }

    /// Returns the number of items in the list.
    pub fn len(&self) -> Result<usize, ElementError> {
        match &*self.inner.borrow() {
            Payload::List(items) => Ok(items.len()),
            other => Err(ElementError::mismatch("len", Kind::List, other.kind())),
        }
    }

    /// Returns true if the list has no items.
    pub fn is_empty(&self) -> Result<bool, ElementError> {
        match &*self.inner.borrow() {
            Payload::List(items) => Ok(items.is_empty()),
            other => Err(ElementError::mismatch("is_empty", Kind::List, other.kind())),
        }
    }

    // ---- map operations ----

    /// Returns the handle at `key`, or `None` when the key is absent.
    ///
    /// Lookups never insert: a miss leaves the key set untouched.
    pub fn get_key(&self, key: &str) -> Result<Option<Element>, ElementError> {
        match &*self.inner.borrow() {
            Payload::Map(entries) => Ok(entries.get(key).cloned()),
            other => Err(ElementError::mismatch("get_key", Kind::Map, other.kind())),
        }
    }

    /// Inserts or replaces the handle at `key`, returning the replaced handle.
    pub fn set_key(
        &self,
        key: impl Into<String>,
        element: Element,
    ) -> Result<Option<Element>, ElementError> {
        match &mut *self.inner.borrow_mut() {
            Payload::Map(entries) => Ok(entries.insert(key.into(), element)),
            other => Err(ElementError::mismatch("set_key", Kind::Map, other.kind())),
        }
    }

    /// Removes the entry at `key`. An absent key is a no-op.
    pub fn remove_key(&self, key: &str) -> Result<(), ElementError> {
        match &mut *self.inner.borrow_mut() {
            Payload::Map(entries) => {
                entries.remove(key);
                Ok(())
            }
            other => Err(ElementError::mismatch("remove_key", Kind::Map, other.kind())),
        }
    }

    /// Returns true if the map has an entry at `key`.
    pub fn contains_key(&self, key: &str) -> Result<bool, ElementError> {
        match &*self.inner.borrow() {
            Payload::Map(entries) => Ok(entries.contains_key(key)),
            other => Err(ElementError::mismatch(
                "contains_key",
                Kind::Map,
                other.kind(),
            )),
        }
    }

    /// Returns the map's keys in sorted order.
    pub fn keys(&self) -> Result<Vec<String>, ElementError> {
        match &*self.inner.borrow() {
            Payload::Map(entries) => Ok(entries.keys().cloned().collect()),
            other => Err(ElementError::mismatch("keys", Kind::Map, other.kind())),
        }
    }

    // ---- recursive lookup ----

    /// Descends through nested maps along a `/`-delimited identifier.
    ///
    /// Every traversed element, including this one, must be a map; a non-map
    /// on the way reports [`ElementError::TypeMismatch`]. An absent key at
    /// any step is `Ok(None)`, not an error. The element found at the final
    /// key may be of any kind and aliases the tree.
    ///
    /// ```
    /// use confdata::Element;
    ///
    /// let root = Element::from_text(r#"{"inner": {"leaf": 42}}"#)?;
    /// assert_eq!(root.find("inner/leaf")?.unwrap(), 42);
    /// assert_eq!(root.find("inner/missing")?, None);
    /// assert!(root.find("inner/leaf/deeper").is_err()); // leaf is not a map
    /// # Ok::<(), confdata::Error>(())
    /// ```
    pub fn find(&self, identifier: &str) -> Result<Option<Element>, ElementError> {
        let mut current = self.clone();
        for key in identifier.split('/') {
            let child = {
                let payload = current.inner.borrow();
                match &*payload {
                    Payload::Map(entries) => entries.get(key).cloned(),
                    other => return Err(ElementError::mismatch("find", Kind::Map, other.kind())),
                }
            };
            match child {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Exception-free variant of [`Element::find`].
    ///
    /// Collapses both failure modes — absent key and non-map on the way —
    /// into `None`. Callers that need to tell the two apart must use `find`.
    pub fn find_opt(&self, identifier: &str) -> Option<Element> {
        self.find(identifier).ok().flatten()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner.borrow(), f)
    }
}

/// Structural equality: same kind and value at every position, same key sets
/// in every map, same length and order in every list.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        payload_eq(&self.inner.borrow(), &other.inner.borrow())
    }
}

fn payload_eq(a: &Payload, b: &Payload) -> bool {
    match (a, b) {
        (Payload::Int(x), Payload::Int(y)) => x == y,
        (Payload::Real(x), Payload::Real(y)) => x == y,
        (Payload::Bool(x), Payload::Bool(y)) => x == y,
        (Payload::Str(x), Payload::Str(y)) => x == y,
        (Payload::List(x), Payload::List(y)) => x == y,
        (Payload::Map(x), Payload::Map(y)) => x == y,
        _ => false,
    }
}

// Convenient From implementations for common types
impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Element::new(Payload::Int(value))
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Element::new(Payload::Int(value as i64))
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::new(Payload::Real(value))
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::new(Payload::Bool(value))
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::new(Payload::Str(value.to_string()))
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::new(Payload::Str(value))
    }
}

impl From<Vec<Element>> for Element {
    fn from(items: Vec<Element>) -> Self {
        Element::new(Payload::List(items))
    }
}

impl From<BTreeMap<String, Element>> for Element {
    fn from(entries: BTreeMap<String, Element>) -> Self {
        Element::new(Payload::Map(entries))
    }
}

// TryFrom implementations mirroring the strict getter surface
impl TryFrom<&Element> for i64 {
    type Error = ElementError;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        element.int_value()
    }
}

impl TryFrom<&Element> for f64 {
    type Error = ElementError;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        element.real_value()
    }
}

impl TryFrom<&Element> for bool {
    type Error = ElementError;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        element.bool_value()
    }
}

impl TryFrom<&Element> for String {
    type Error = ElementError;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        element.string_value()
    }
}

// PartialEq implementations for comparing scalar elements with plain values
impl PartialEq<i64> for Element {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<f64> for Element {
    fn eq(&self, other: &f64) -> bool {
        self.as_real() == Some(*other)
    }
}

impl PartialEq<bool> for Element {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<&str> for Element {
    fn eq(&self, other: &&str) -> bool {
        match &*self.inner.borrow() {
            Payload::Str(s) => s == other,
            _ => false,
        }
    }
}

// Reverse implementations for symmetry
impl PartialEq<Element> for i64 {
    fn eq(&self, other: &Element) -> bool {
        other == self
    }
}

impl PartialEq<Element> for f64 {
    fn eq(&self, other: &Element) -> bool {
        other == self
    }
}

impl PartialEq<Element> for bool {
    fn eq(&self, other: &Element) -> bool {
        other == self
    }
}

impl PartialEq<Element> for &str {
    fn eq(&self, other: &Element) -> bool {
        other == self
    }
}
