//! Field accessors over raw item data.
//!
//! Raw items are opaque JSON values owned by the host. The tree only looks at
//! them through a handful of logical fields (children, display text, id,
//! expanded flag, hidden flag, ...). Each logical field is an [`ItemField`]
//! built once by the options resolver, so the rest of the crate never does
//! string-keyed lookups itself.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Externally-owned data wrapped by a tree node.
pub type RawItem = Value;

/// Shared handle to a field accessor.
pub type Field = Arc<dyn ItemField>;

/// Read/write access to one logical field of a raw item.
pub trait ItemField: fmt::Debug + Send + Sync {
    /// Read the field. Missing fields and non-object items yield `None`.
    fn get<'a>(&self, item: &'a RawItem) -> Option<&'a RawItem>;

    /// Write the field. Writing into an item that cannot hold it is a no-op.
    fn set(&self, item: &mut RawItem, value: RawItem);

    /// Remove the field and return its previous value.
    fn take(&self, item: &mut RawItem) -> Option<RawItem>;

    /// Read the field as a flag.
    fn get_flag(&self, item: &RawItem) -> bool {
        self.get(item).is_some_and(is_truthy)
    }

    /// Write the field as a flag.
    fn set_flag(&self, item: &mut RawItem, value: bool) {
        self.set(item, Value::Bool(value));
    }

    /// Read the field as display text. Strings are returned as-is, numbers
    /// and booleans are formatted, anything else is absent.
    fn get_text(&self, item: &RawItem) -> Option<String> {
        match self.get(item)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Build the accessor for a configured field name.
///
/// Names starting with `/` are JSON pointers into nested item structure,
/// everything else is a plain top-level key.
pub fn field(name: &str) -> Field {
    if name.starts_with('/') {
        Arc::new(PointerField::new(name))
    } else {
        Arc::new(KeyField::new(name))
    }
}

/// Truthiness of a JSON value: `false`, `null`, `0`, and `""` are false.
pub fn is_truthy(value: &RawItem) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A top-level object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyField {
    name: String,
}

impl KeyField {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ItemField for KeyField {
    fn get<'a>(&self, item: &'a RawItem) -> Option<&'a RawItem> {
        item.as_object()?.get(&self.name)
    }

    fn set(&self, item: &mut RawItem, value: RawItem) {
        if let Some(map) = item.as_object_mut() {
            map.insert(self.name.clone(), value);
        }
    }

    fn take(&self, item: &mut RawItem) -> Option<RawItem> {
        item.as_object_mut()?.remove(&self.name)
    }
}

/// A JSON pointer (`/meta/open`) into nested item structure.
///
/// Writes create missing intermediate objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerField {
    pointer: String,
}

impl PointerField {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
        }
    }

    fn split(&self) -> Option<(&str, String)> {
        let idx = self.pointer.rfind('/')?;
        let last = self.pointer[idx + 1..].replace("~1", "/").replace("~0", "~");
        Some((&self.pointer[..idx], last))
    }

    fn parent_mut<'a>(
        &self,
        item: &'a mut RawItem,
        create: bool,
    ) -> Option<&'a mut Map<String, Value>> {
        let (parent, _) = self.split()?;
        let mut current = item;
        for token in parent.split('/').skip(1) {
            let key = token.replace("~1", "/").replace("~0", "~");
            let map = current.as_object_mut()?;
            if create && !map.contains_key(&key) {
                map.insert(key.clone(), Value::Object(Map::new()));
            }
            current = map.get_mut(&key)?;
        }
        current.as_object_mut()
    }
}

impl ItemField for PointerField {
    fn get<'a>(&self, item: &'a RawItem) -> Option<&'a RawItem> {
        item.pointer(&self.pointer)
    }

    fn set(&self, item: &mut RawItem, value: RawItem) {
        let Some((_, last)) = self.split() else {
            return;
        };
        if let Some(map) = self.parent_mut(item, true) {
            map.insert(last, value);
        }
    }

    fn take(&self, item: &mut RawItem) -> Option<RawItem> {
        let (_, last) = self.split()?;
        self.parent_mut(item, false)?.remove(&last)
    }
}

/// Identifier of a node, derived from its item's id field.
///
/// String ids are used verbatim; numeric and boolean ids are formatted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an id from a raw id value. Null, arrays and objects are not ids.
    pub fn from_value(value: &RawItem) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            Value::Bool(b) => Some(Self(b.to_string())),
            _ => None,
        }
    }

    /// A fresh random id for items that carry none.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
