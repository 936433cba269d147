//! Recursive key normalization.
//!
//! [`apply_to_keys`] walks a [`Value`] depth-first and rebuilds it with every
//! object key passed through [`convert_key`]. Array elements are visited in
//! order; leaves (strings, numbers, booleans, null, dates, regexps,
//! functions) are copied as they are. The input is never modified.
//!
//! ```rust
//! use rekey::{apply_to_keys, Convert, Value};
//! use serde_json::json;
//!
//! let input = Value::from(json!({ "FooBar2": { "foo_Bar_3": "" } }));
//! let output = apply_to_keys(&input, &Convert::from("camel"));
//! assert_eq!(output, Value::from(json!({ "fooBar2": { "fooBar_3": "" } })));
//! ```
//!
//! The traversal is recursive, so nesting depth is bounded by the stack.

mod options;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::case::{CaseTable, KeyFn};
use crate::classify::{Node, classify};
use crate::value::Value;

pub use options::{NormalizeKeys, NormalizeOptions, normalize};

/// How each key is rewritten.
#[derive(Clone)]
pub enum Convert {
    /// A transform looked up by name in a [`CaseTable`]. Unknown names leave
    /// keys unchanged.
    Named(String),
    /// A caller-supplied transform.
    Function(KeyFn),
}

impl Convert {
    pub fn function(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }
}

impl Default for Convert {
    fn default() -> Self {
        Self::Named("camel".to_owned())
    }
}

impl From<&str> for Convert {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for Convert {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl fmt::Debug for Convert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Only named transforms can come from configuration files.
impl<'de> Deserialize<'de> for Convert {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Named)
    }
}

/// Rebuilds `input` with every object key converted, using the built-in
/// case table.
pub fn apply_to_keys(input: &Value, convert: &Convert) -> Value {
    apply_to_keys_with(input, convert, CaseTable::builtin_ref())
}

/// [`apply_to_keys`] with named transforms resolved against `cases`.
pub fn apply_to_keys_with(input: &Value, convert: &Convert, cases: &CaseTable) -> Value {
    match classify(input) {
        Node::Leaf(leaf) => leaf.clone(),
        Node::Sequence(items) => Value::Array(
            items.iter()
                .map(|item| apply_to_keys_with(item, convert, cases))
                .collect(),
        ),
        Node::Mapping(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    (convert_key_with(key, convert, cases), apply_to_keys_with(value, convert, cases))
                })
                .collect(),
        ),
    }
}

/// Converts one key, using the built-in case table.
pub fn convert_key(key: &str, convert: &Convert) -> String {
    convert_key_with(key, convert, CaseTable::builtin_ref())
}

/// [`convert_key`] with named transforms resolved against `cases`.
pub fn convert_key_with(key: &str, convert: &Convert, cases: &CaseTable) -> String {
    match convert {
        Convert::Function(f) => f(key),
        Convert::Named(name) => match cases.get(name) {
            Some(transform) => transform(key),
            None => key.to_owned(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use regex::Regex;
    use serde_json::json;

    use super::*;
    use crate::value::Function;

    fn bang() -> Convert {
        Convert::function(|key| format!("{key}!"))
    }

    #[test]
    fn convert_key_calls_a_function() {
        assert_eq!(convert_key("foo", &Convert::function(|_| "foobar".to_owned())), "foobar");
    }

    #[test]
    fn convert_key_looks_up_named_transforms() {
        assert_eq!(convert_key("foo-bar", &Convert::from("camel")), "fooBar");
        assert_eq!(convert_key("foo-bar", &Convert::from("pascalCase")), "FooBar");
    }

    #[test]
    fn unknown_transform_leaves_the_key() {
        assert_eq!(convert_key("Foo-Bar", &Convert::from("fooCase")), "Foo-Bar");
    }

    #[test]
    fn custom_table_replaces_the_builtin_one() {
        let mut cases = CaseTable::empty();
        cases.insert("reverse", |s: &str| s.chars().rev().collect());
        assert_eq!(convert_key_with("abc", &Convert::from("reverse"), &cases), "cba");
        assert_eq!(convert_key_with("a-b", &Convert::from("camel"), &cases), "a-b");
    }

    #[test]
    fn leaves_are_returned_unchanged() {
        let f = Function::new(|_| Value::Null);
        let leaves = [
            Value::from("Foo-Bar"),
            Value::from(42),
            Value::from(true),
            Value::Null,
            Value::from(Utc::now()),
            Value::from(Regex::new("A-Z").unwrap()),
            Value::from(f),
        ];
        for leaf in leaves {
            assert_eq!(apply_to_keys(&leaf, &bang()), leaf);
        }
    }

    #[test]
    fn arrays_keep_length_and_order() {
        let input = Value::from(json!(["b", { "x": 1 }, ["c"], null]));
        let output = apply_to_keys(&input, &bang());
        assert_eq!(output, Value::from(json!(["b", { "x!": 1 }, ["c"], null])));
    }

    #[test]
    fn object_keys_are_converted_and_values_recursed() {
        let input = Value::from(json!({ "fo": true, "ba": { "inner": [ { "deep": 1 } ] } }));
        let output = apply_to_keys(&input, &bang());
        assert_eq!(
            output,
            Value::from(json!({ "fo!": true, "ba!": { "inner!": [ { "deep!": 1 } ] } })),
        );
    }

    #[test]
    fn every_key_is_converted_exactly_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let counting = Convert::function(|key| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            key.to_owned()
        });
        let input = Value::from(json!({ "a": { "b": 1, "c": [ { "d": 2 } ] }, "e": [1, 2] }));
        let output = apply_to_keys(&input, &counting);
        assert_eq!(output, input);
        assert_eq!(CALLS.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn input_is_left_untouched() {
        let input = Value::from(json!({ "foo-bar": { "baz-qux": [1] } }));
        let before = input.clone();
        let _ = apply_to_keys(&input, &Convert::default());
        assert_eq!(input, before);
    }

    #[test]
    fn colliding_keys_keep_the_last_value() {
        let input = Value::from(json!({ "foo-bar": 1, "other": 2, "foo_bar": 3 }));
        let output = apply_to_keys(&input, &Convert::from("camel"));
        assert_eq!(output, Value::from(json!({ "fooBar": 3, "other": 2 })));

        // Map equality ignores order; the merged key keeps its first slot.
        let keys: Vec<&str> = output.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["fooBar", "other"]);
    }

    #[test]
    fn regexp_inside_a_structure_passes_through() {
        let mut inner = crate::value::Map::new();
        inner.insert("foo_bar_7".to_owned(), Value::from(Regex::new("A-Z").unwrap()));
        let input = Value::from(vec![Value::Object(inner)]);

        let output = apply_to_keys(&input, &Convert::from("camel"));
        let converted = &output.as_array().unwrap()[0];
        assert_eq!(
            converted.get("fooBar_7"),
            Some(&Value::from(Regex::new("A-Z").unwrap())),
        );
    }

    #[test]
    fn convert_deserializes_from_a_name() {
        let convert: Convert = serde_json::from_value(json!("snake")).unwrap();
        assert!(matches!(convert, Convert::Named(ref n) if n == "snake"));
    }
}
