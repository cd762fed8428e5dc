//! Attribute values and the ordered attribute list of a node.

use compact_str::CompactString;
use indexmap::IndexMap;

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrValue {
    /// Present in the list but never rendered
    #[default]
    Null,
    /// Boolean attribute; rendering depends on the output convention
    Bool(bool),
    /// A single value
    Text(String),
    /// Several values, rendered space-separated (class lists)
    List(Vec<String>),
}

impl AttrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// The value as a single string, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The individual values: one for `Text`, all for `List`, none otherwise.
    pub fn values(&self) -> Vec<&str> {
        match self {
            AttrValue::Text(s) => vec![s.as_str()],
            AttrValue::List(items) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        AttrValue::Text(value.clone())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(values: Vec<String>) -> Self {
        AttrValue::List(values)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(values: Vec<&str>) -> Self {
        AttrValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AttrValue {
    fn from(values: [&str; N]) -> Self {
        AttrValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

macro_rules! numeric_attr_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::Text(value.to_string())
                }
            }
        )*
    };
}

numeric_attr_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Ordered attribute list.
///
/// Insertion order is kept; setting an existing name replaces the value in
/// place. A `Null` value keeps its slot but counts as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: IndexMap<CompactString, AttrValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by name; `None` for missing and `Null` entries.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.get(name).filter(|v| !v.is_null())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AttrValue> {
        self.entries.get_mut(name)
    }

    /// Whether the attribute is set and not `Null`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a value, replacing any previous one at the same position.
    pub fn set(&mut self, name: &str, value: AttrValue) {
        if let Some(slot) = self.entries.get_mut(name) {
            *slot = value;
        } else {
            self.entries.insert(CompactString::new(name), value);
        }
    }

    /// Remove an attribute. Returns the old value if there was a non-null one.
    pub fn unset(&mut self, name: &str) -> Option<AttrValue> {
        if !self.contains(name) {
            return None;
        }
        self.entries.shift_remove(name)
    }

    /// Mutable access to an entry, inserting `Null` when missing.
    pub(crate) fn entry(&mut self, name: &str) -> &mut AttrValue {
        self.entries
            .entry(CompactString::new(name))
            .or_insert(AttrValue::Null)
    }

    /// Iterate all entries in insertion order, including `Null` ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries, including `Null` ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn set_overwrites_in_place() {
        let mut attrs = Attributes::new();
        attrs.set("id", "a".into());
        attrs.set("class", "b".into());
        attrs.set("id", "c".into());

        let order: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["id", "class"]);
        assert_eq!(attrs.get("id"), Some(&AttrValue::Text("c".to_string())));
    }

    #[test]
    fn null_counts_as_absent() {
        let mut attrs = Attributes::new();
        attrs.set("title", AttrValue::Null);
        assert!(!attrs.contains("title"));
        assert_eq!(attrs.get("title"), None);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.unset("title"), None);
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn unset_removes_and_keeps_order() {
        let mut attrs = Attributes::new();
        attrs.set("a", "1".into());
        attrs.set("b", "2".into());
        attrs.set("c", "3".into());
        assert_eq!(attrs.unset("b"), Some(AttrValue::Text("2".to_string())));
        let order: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["a", "c"]);
        assert_eq!(attrs.unset("missing"), None);
    }

    #[test]
    fn numbers_stringify_without_locale() {
        assert_eq!(AttrValue::from(3), AttrValue::Text("3".to_string()));
        assert_eq!(AttrValue::from(1.0_f64), AttrValue::Text("1".to_string()));
        assert_eq!(AttrValue::from(0.25_f64), AttrValue::Text("0.25".to_string()));
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(AttrValue::from(None::<&str>), AttrValue::Null);
        assert_eq!(AttrValue::from(Some("x")), AttrValue::Text("x".to_string()));
    }

    #[test]
    fn entry_inserts_null() {
        let mut attrs = Attributes::new();
        assert!(attrs.entry("style").is_null());
        *attrs.entry("style") = AttrValue::from("color:red;");
        assert_eq!(attrs.get("style").and_then(AttrValue::as_text), Some("color:red;"));
    }
}
