//! Documentation tags recorded on a symbol.

use indexmap::IndexMap;
use serde::Serialize;

/// Value stored under a tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    /// Boolean marker such as `@private` or the derived `method` tag.
    Flag(bool),
    /// Free text or a qualified id (`@since 1.2`, derived `extends`).
    Text(String),
    /// Repeated textual tags (`@todo` written several times).
    List(Vec<String>),
}

impl TagValue {
    /// Whether the tag counts as set. Only `Flag(false)` does not.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(_) | Self::List(_) => true,
        }
    }

    /// Textual content, if the tag carries any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(items) => items.first().map(String::as_str),
            Self::Flag(_) => None,
        }
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered tag map with accumulation semantics.
///
/// Setting a textual tag twice keeps both values in order; setting
/// `private` or `protected` drops any `public` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags {
    entries: IndexMap<String, TagValue>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `name`, accumulating repeated text.
    pub fn set(&mut self, name: &str, value: impl Into<TagValue>) {
        let value = value.into();
        match self.entries.get_mut(name) {
            Some(existing) => {
                let previous = std::mem::replace(existing, TagValue::Flag(false));
                *existing = merge(previous, value);
            }
            None => {
                self.entries.insert(name.to_string(), value);
            }
        }

        if name == "private" || name == "protected" {
            self.entries.shift_remove("public");
        }
    }

    /// Overwrite `name` without accumulation. Used for derived tags.
    pub fn insert(&mut self, name: &str, value: impl Into<TagValue>) {
        self.entries.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.entries.get(name)
    }

    /// `true` when `name` is present and truthy.
    pub fn has(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(TagValue::is_truthy)
    }

    /// Textual value of `name`, the first entry for lists.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(TagValue::as_text)
    }

    pub fn remove(&mut self, name: &str) -> Option<TagValue> {
        self.entries.shift_remove(name)
    }

    /// Merge `other` into `self`, accumulating text like [`Tags::set`].
    pub fn extend_from(&mut self, other: &Tags) {
        for (name, value) in &other.entries {
            self.set(name, value.clone());
        }
    }

    /// Truthy entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.entries
            .iter()
            .filter(|(_, value)| value.is_truthy())
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Flat listing: a bare name per scalar tag and `name: value` per list item.
    pub fn to_vec(&self) -> Vec<String> {
        let mut result = Vec::new();
        for (name, value) in self.iter() {
            match value {
                TagValue::List(items) => {
                    result.extend(items.iter().map(|item| format!("{name}: {item}")));
                }
                _ => result.push(name.to_string()),
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

fn merge(previous: TagValue, value: TagValue) -> TagValue {
    match (previous, value) {
        (TagValue::List(mut items), TagValue::Text(text)) => {
            items.push(text);
            TagValue::List(items)
        }
        (TagValue::List(mut items), TagValue::List(more)) => {
            items.extend(more);
            TagValue::List(items)
        }
        (TagValue::Text(first), TagValue::Text(text)) => TagValue::List(vec![first, text]),
        (TagValue::Text(first), TagValue::List(more)) => {
            TagValue::List(std::iter::once(first).chain(more).collect())
        }
        (_, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_text_accumulates_in_order() {
        let mut tags = Tags::new();
        tags.set("x", "1");
        tags.set("x", "2");
        assert_eq!(
            tags.get("x"),
            Some(&TagValue::List(vec!["1".into(), "2".into()]))
        );

        tags.set("x", "3");
        assert_eq!(
            tags.get("x"),
            Some(&TagValue::List(vec!["1".into(), "2".into(), "3".into()]))
        );
    }

    #[test]
    fn private_and_protected_remove_public() {
        let mut tags = Tags::new();
        tags.set("public", true);
        tags.set("private", true);
        assert!(!tags.has("public"));
        assert!(tags.has("private"));

        tags.set("public", true);
        tags.set("protected", true);
        assert!(tags.get("public").is_none());
    }

    #[test]
    fn flag_is_replaced_by_text() {
        let mut tags = Tags::new();
        tags.set("deprecated", true);
        tags.set("deprecated", "since v2.0");
        assert_eq!(tags.text("deprecated"), Some("since v2.0"));
    }

    #[test]
    fn enumeration_skips_false_flags() {
        let mut tags = Tags::new();
        tags.set("constructor", false);
        tags.set("todo", "a");
        tags.set("todo", "b");
        tags.set("global", true);

        assert_eq!(tags.to_vec(), vec!["todo: a", "todo: b", "global"]);
        assert!(!tags.has("constructor"));
    }

    #[test]
    fn insert_overwrites() {
        let mut tags = Tags::new();
        tags.insert("alias", "a");
        tags.insert("alias", "b");
        assert_eq!(tags.get("alias"), Some(&TagValue::Text("b".into())));
    }
}
