//! Type classification for [`Value`].
//!
//! One dispatch step decides what a value is. The predicates below are thin
//! views over [`Kind`]; [`classify`] is what the traversal matches on.

use crate::value::{Map, Value};

/// The closed set of shapes a [`Value`] can take.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    Mapping,
    Sequence,
    Date,
    RegExp,
    Boolean,
    Function,
    /// Strings, numbers and `null`.
    Primitive,
}

impl Kind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Mapping,
            Value::Array(_) => Self::Sequence,
            Value::Date(_) => Self::Date,
            Value::RegExp(_) => Self::RegExp,
            Value::Bool(_) => Self::Boolean,
            Value::Function(_) => Self::Function,
            Value::Null | Value::Number(_) | Value::String(_) => Self::Primitive,
        }
    }

    /// Reference-like kinds: everything except booleans and primitives.
    pub fn is_object(self) -> bool {
        !matches!(self, Self::Boolean | Self::Primitive)
    }
}

/// A value as seen by the key traversal.
#[derive(Debug)]
pub enum Node<'a> {
    Mapping(&'a Map),
    Sequence(&'a [Value]),
    /// Returned unchanged: primitives, booleans, dates, regexps, functions.
    Leaf(&'a Value),
}

pub fn classify(value: &Value) -> Node<'_> {
    match value {
        Value::Object(map) => Node::Mapping(map),
        Value::Array(items) => Node::Sequence(items),
        leaf => Node::Leaf(leaf),
    }
}

pub fn is_object(value: &Value) -> bool {
    Kind::of(value).is_object()
}

pub fn is_array(value: &Value) -> bool {
    Kind::of(value) == Kind::Sequence
}

pub fn is_date(value: &Value) -> bool {
    Kind::of(value) == Kind::Date
}

pub fn is_regexp(value: &Value) -> bool {
    Kind::of(value) == Kind::RegExp
}

pub fn is_boolean(value: &Value) -> bool {
    Kind::of(value) == Kind::Boolean
}

pub fn is_function(value: &Value) -> bool {
    Kind::of(value) == Kind::Function
}
