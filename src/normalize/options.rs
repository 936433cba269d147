//! Configuration and the request-facing side of key normalization.

use serde::Deserialize;
use tracing::{debug, trace, warn};

use super::{Convert, apply_to_keys_with};
use crate::case::CaseTable;
use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::{Fields, Request};
use crate::value::{Map, Value};

const DEFAULT_TARGET: &str = "query";

/// Options for [`normalize`]. Every field is optional.
///
/// | option | meaning | default |
/// |---|---|---|
/// | `target` | field read from the request | `"query"` |
/// | `name` | field written with the result | same as `target` |
/// | `convert` | key transform | `"camel"` |
/// | `cases` | table for named transforms | [`CaseTable::builtin`] |
///
/// Empty strings count as unset. `target`, `name` and a named `convert` can
/// be loaded from configuration:
///
/// ```rust
/// use rekey::NormalizeOptions;
///
/// let opts: NormalizeOptions =
///     serde_json::from_str(r#"{ "target": "body", "convert": "snake" }"#).unwrap();
/// assert_eq!(opts.target.as_deref(), Some("body"));
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeOptions {
    pub target: Option<String>,
    pub name: Option<String>,
    pub convert: Option<Convert>,
    #[serde(skip)]
    pub cases: Option<CaseTable>,
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// A named transform (`"snake"`) or a prepared [`Convert`].
    pub fn convert(mut self, convert: impl Into<Convert>) -> Self {
        self.convert = Some(convert.into());
        self
    }

    pub fn convert_fn(self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.convert(Convert::function(f))
    }

    pub fn cases(mut self, cases: CaseTable) -> Self {
        self.cases = Some(cases);
        self
    }
}

/// Builds the key-normalization middleware from `options`.
///
/// ```rust
/// use rekey::{normalize, NormalizeOptions, Router};
///
/// let app = Router::new()
///     .middleware(normalize(NormalizeOptions::new().target("body").convert("snake")));
/// ```
pub fn normalize(options: NormalizeOptions) -> NormalizeKeys {
    NormalizeKeys::from_options(options)
}

/// Middleware that rewrites the keys of one request field.
///
/// Reads `target`, normalizes it and writes the result to `name`. A missing
/// or falsy target is first replaced with an empty object, so both fields
/// always hold an object afterwards. The resolved settings never change.
#[derive(Clone, Debug)]
pub struct NormalizeKeys {
    target: String,
    name: String,
    convert: Convert,
    cases: CaseTable,
}

impl NormalizeKeys {
    pub fn from_options(options: NormalizeOptions) -> Self {
        let target = non_empty(options.target).unwrap_or_else(|| DEFAULT_TARGET.to_owned());
        let name = non_empty(options.name).unwrap_or_else(|| target.clone());
        let convert = match options.convert {
            Some(Convert::Named(n)) if n.is_empty() => Convert::default(),
            Some(convert) => convert,
            None => Convert::default(),
        };
        let cases = options.cases.unwrap_or_else(CaseTable::builtin);

        if let Convert::Named(n) = &convert {
            if !cases.contains(n) {
                warn!(convert = %n, "unknown case transform; keys will pass through unchanged");
            }
        }
        debug!(%target, %name, ?convert, "key normalization configured");

        Self { target, name, convert, cases }
    }

    pub fn target(&self) -> &str { &self.target }
    pub fn name(&self) -> &str { &self.name }
    pub fn convert(&self) -> &Convert { &self.convert }

    /// Normalizes `req[target]` into `req[name]`.
    ///
    /// A panic in a user-supplied transform propagates to the caller.
    pub fn apply<R: Fields + ?Sized>(&self, req: &mut R) {
        if req.field(&self.target).is_none_or(Value::is_falsy) {
            req.set_field(&self.target, Value::Object(Map::new()));
        }
        let normalized = match req.field(&self.target) {
            Some(source) => apply_to_keys_with(source, &self.convert, &self.cases),
            None => Value::Object(Map::new()),
        };
        trace!(target = %self.target, name = %self.name, "normalized request keys");
        req.set_field(&self.name, normalized);
    }
}

impl Default for NormalizeKeys {
    fn default() -> Self {
        Self::from_options(NormalizeOptions::default())
    }
}

impl Middleware for NormalizeKeys {
    fn handle<'a>(&'a self, mut req: Request, next: Next<'a>) -> BoxFuture<'a> {
        self.apply(&mut req);
        Box::pin(next.run(req))
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(json: serde_json::Value) -> Map {
        match Value::from(json) {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let mw = normalize(NormalizeOptions::new());
        assert_eq!(mw.target(), "query");
        assert_eq!(mw.name(), "query");
        assert!(matches!(mw.convert(), Convert::Named(n) if n == "camel"));
    }

    #[test]
    fn name_defaults_to_target() {
        let mw = normalize(NormalizeOptions::new().target("body"));
        assert_eq!(mw.target(), "body");
        assert_eq!(mw.name(), "body");
    }

    #[test]
    fn empty_strings_count_as_unset() {
        let mw = normalize(NormalizeOptions::new().target("").name("").convert(""));
        assert_eq!(mw.target(), "query");
        assert_eq!(mw.name(), "query");
        assert!(matches!(mw.convert(), Convert::Named(n) if n == "camel"));
    }

    #[test]
    fn options_load_from_json() {
        let opts: NormalizeOptions =
            serde_json::from_value(json!({ "target": "normKey", "name": "newKey", "convert": "snake" }))
                .unwrap();
        let mw = normalize(opts);
        assert_eq!((mw.target(), mw.name()), ("normKey", "newKey"));
        assert!(matches!(mw.convert(), Convert::Named(n) if n == "snake"));
    }

    #[test]
    fn unknown_options_are_rejected() {
        let err = serde_json::from_value::<NormalizeOptions>(json!({ "traget": "body" }));
        assert!(err.is_err());
    }

    #[test]
    fn apply_rewrites_the_target_in_place_by_default() {
        let mut req = fields(json!({ "query": { "foo-bar": "", "FooBar2": "" } }));
        NormalizeKeys::default().apply(&mut req);
        assert_eq!(req.get("query"), Some(&Value::from(json!({ "fooBar": "", "fooBar2": "" }))));
    }

    #[test]
    fn apply_writes_to_a_separate_name() {
        let mut req = fields(json!({ "normKey": { "foo-bar": "" } }));
        normalize(NormalizeOptions::new().target("normKey").name("newKey").convert_fn(|s| format!("{s}!")))
            .apply(&mut req);
        assert_eq!(req.get("normKey"), Some(&Value::from(json!({ "foo-bar": "" }))));
        assert_eq!(req.get("newKey"), Some(&Value::from(json!({ "foo-bar!": "" }))));
    }

    #[test]
    fn missing_target_becomes_an_empty_object() {
        let mut req = Map::new();
        normalize(NormalizeOptions::new().target("normKey").name("newKey")).apply(&mut req);
        assert_eq!(req.get("normKey"), Some(&Value::from(json!({}))));
        assert_eq!(req.get("newKey"), Some(&Value::from(json!({}))));
    }

    #[test]
    fn falsy_target_becomes_an_empty_object() {
        for falsy in [json!(null), json!(false), json!(0), json!("")] {
            let mut req = fields(json!({ "query": falsy }));
            NormalizeKeys::default().apply(&mut req);
            assert_eq!(req.get("query"), Some(&Value::from(json!({}))));
        }
    }

    #[test]
    fn array_target_stays_an_array() {
        let mut req = fields(json!({ "query": [ { "a-b": 1 } ] }));
        NormalizeKeys::default().apply(&mut req);
        assert_eq!(req.get("query"), Some(&Value::from(json!([ { "aB": 1 } ]))));
    }

    #[test]
    fn custom_case_table() {
        let mut cases = CaseTable::empty();
        cases.insert("upper", |s: &str| s.to_uppercase());
        let mw = normalize(NormalizeOptions::new().convert("upper").cases(cases));

        let mut req = fields(json!({ "query": { "a-b": 1 } }));
        mw.apply(&mut req);
        assert_eq!(req.get("query"), Some(&Value::from(json!({ "A-B": 1 }))));
    }
}
