//! Named case transforms.
//!
//! Most transforms start by splitting a key into lowercase words:
//!
//! ```text
//! "FooBar2"     → ["foo", "bar2"]
//! "foo_Bar_3"   → ["foo", "bar", "3"]
//! "XMLHttpReq"  → ["xml", "http", "req"]
//! ```
//!
//! and then join them back in the target style. A [`CaseTable`] maps the
//! specifier names accepted by [`Convert::Named`](crate::Convert::Named) to
//! the transform functions.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

/// A string-to-string key transform.
pub type KeyFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

// lowercase or digit, then uppercase: "fooBar" → "foo Bar"
static LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\p{Ll}\p{Nd}])(\p{Lu})").expect("valid regex"));

// uppercase run, then a capitalised word: "XMLHttp" → "XML Http"
static UPPER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\p{Lu})(\p{Lu}\p{Ll})").expect("valid regex"));

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{Nd}]+").expect("valid regex"));

static BUILTIN: LazyLock<CaseTable> = LazyLock::new(CaseTable::builtin_table);

/// Splits `input` into lowercase words.
pub fn words(input: &str) -> Vec<String> {
    let spaced = LOWER_UPPER.replace_all(input, "$1 $2");
    let spaced = UPPER_RUN.replace_all(&spaced, "$1 $2");
    NON_WORD
        .split(&spaced)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

pub fn no(input: &str) -> String {
    words(input).join(" ")
}

/// `"foo-bar"` → `"fooBar"`. Words starting with a digit keep a `_` in front:
/// `"foo bar 1"` → `"fooBar_1"`.
pub fn camel(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, word) in words(input).iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else if word.starts_with(|c: char| c.is_numeric()) {
            out.push('_');
            out.push_str(word);
        } else {
            out.push_str(&upper_first(word));
        }
    }
    out
}

pub fn pascal(input: &str) -> String {
    upper_first(&camel(input))
}

pub fn snake(input: &str) -> String {
    words(input).join("_")
}

pub fn constant(input: &str) -> String {
    snake(input).to_uppercase()
}

pub fn param(input: &str) -> String {
    words(input).join("-")
}

pub fn dot(input: &str) -> String {
    words(input).join(".")
}

pub fn path(input: &str) -> String {
    words(input).join("/")
}

/// `"foo bar"` → `"Foo-Bar"`.
pub fn header(input: &str) -> String {
    capitalised(input).join("-")
}

pub fn sentence(input: &str) -> String {
    upper_first(&no(input))
}

pub fn title(input: &str) -> String {
    capitalised(input).join(" ")
}

pub fn lower(input: &str) -> String {
    input.to_lowercase()
}

pub fn upper(input: &str) -> String {
    input.to_uppercase()
}

pub fn lower_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn upper_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn swap(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn capitalised(input: &str) -> Vec<String> {
    words(input).iter().map(|w| upper_first(w)).collect()
}

// ── CaseTable ────────────────────────────────────────────────────────────────

/// Specifier name → transform.
#[derive(Clone, Default)]
pub struct CaseTable {
    entries: HashMap<String, KeyFn>,
}

impl CaseTable {
    /// Every transform in this module, under its short and long names
    /// (`"camel"` and `"camelCase"`, ...).
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Shared reference to the built-in table.
    pub fn builtin_ref() -> &'static Self {
        &BUILTIN
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers `transform` under `name`, replacing any previous entry.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        transform: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> &mut Self {
        self.entries.insert(name.into(), Arc::new(transform));
        self
    }

    pub fn get(&self, name: &str) -> Option<&KeyFn> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn builtin_table() -> Self {
        let transforms: [(&[&str], fn(&str) -> String); 16] = [
            (&["no", "noCase"], no),
            (&["camel", "camelCase"], camel),
            (&["pascal", "pascalCase"], pascal),
            (&["snake", "snakeCase"], snake),
            (&["constant", "constantCase"], constant),
            (&["param", "paramCase", "kebab", "kebabCase"], param),
            (&["dot", "dotCase"], dot),
            (&["path", "pathCase"], path),
            (&["header", "headerCase"], header),
            (&["sentence", "sentenceCase"], sentence),
            (&["title", "titleCase"], title),
            (&["lower", "lowerCase"], lower),
            (&["upper", "upperCase"], upper),
            (&["lcFirst", "lowerCaseFirst"], lower_first),
            (&["ucFirst", "upperCaseFirst"], upper_first),
            (&["swap", "swapCase"], swap),
        ];

        let mut table = Self::empty();
        for (names, transform) in transforms {
            for name in names {
                table.insert(*name, transform);
            }
        }
        table
    }
}

impl fmt::Debug for CaseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("CaseTable").field("names", &names).finish()
    }
}
