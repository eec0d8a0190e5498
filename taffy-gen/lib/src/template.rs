//! URI template handling.
//!
//! Templates use `{param}` placeholders, optionally with a Taffy regex
//! constraint (`{id:[0-9]+}`). This module extracts parameter names,
//! normalises templates for the generated client, and implements the
//! call-time behaviour of the generated proxy: positional interpolation and
//! query-string encoding.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::{Captures, Regex};
use serde_json::Value;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A placeholder the runtime can fill: `{` word characters `}`.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[A-Za-z0-9_]+\}").expect("Invalid placeholder regex"));

/// A placeholder carrying a constraint: `{name:...}`.
static CONSTRAINED_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*([^{}:]*?)\s*:[^{}]*\}").expect("Invalid constrained placeholder regex")
});

static REPEATED_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("Invalid slash regex"));

/// Extracts path parameter names from a URI template.
///
/// Every `/`-separated segment starting with `{` is a parameter; its name is
/// the text inside the braces, without any `:constraint`. Order follows the
/// template and duplicates are kept.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::template::extract_path_params;
///
/// assert!(extract_path_params("/admin/sd/stats").is_empty());
/// assert_eq!(extract_path_params("/a/{x}/b/{y}"), vec!["x", "y"]);
/// assert_eq!(extract_path_params("/items/{id:[0-9]+}"), vec!["id"]);
/// ```
pub fn extract_path_params(template: &str) -> Vec<String> {
    template
        .split('/')
        .filter_map(|segment| segment.trim().strip_prefix('{'))
        .map(|inner| {
            let inner = inner.split('}').next().unwrap_or_default();
            inner.split(':').next().unwrap_or_default().trim().to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Normalises a URI template for the generated client.
///
/// Control characters are dropped, runs of `/` collapse to one, surrounding
/// whitespace is trimmed and placeholder constraints are removed so that
/// the runtime can match every placeholder.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::template::clean_template;
///
/// assert_eq!(clean_template("//app/{companyId}//tickets\n"), "/app/{companyId}/tickets");
/// assert_eq!(clean_template("/items/{id:[0-9]+}"), "/items/{id}");
/// ```
pub fn clean_template(template: &str) -> String {
    let printable: String = template.chars().filter(|c| !c.is_control()).collect();
    let unconstrained = CONSTRAINED_PLACEHOLDER.replace_all(printable.trim(), "{$1}");
    REPEATED_SLASH.replace_all(&unconstrained, "/").into_owned()
}

/// Fills placeholders left to right with positional arguments.
///
/// Placeholders are matched by position, not by name. When there are fewer
/// arguments than placeholders the remaining placeholders stay in the URL;
/// surplus arguments are ignored.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::template::interpolate;
///
/// assert_eq!(
///     interpolate("/app/{companyId}/em/users/{userId}", &["42", "7"]),
///     "/app/42/em/users/7"
/// );
/// assert_eq!(interpolate("/app/{companyId}/x/{id}", &["42"]), "/app/42/x/{id}");
/// ```
pub fn interpolate<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut pending = args.iter();
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match pending.next() {
            Some(arg) => arg.as_ref().to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Percent-encodes a string the way `encodeURIComponent` does.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Encodes a flat data object as a query string.
///
/// Produces `?k1=v1&k2=v2` with keys and values percent-encoded, in the
/// object's own key order. Anything other than a non-empty object yields
/// an empty string.
///
/// ## Examples
///
/// ```
/// use serde_json::json;
/// use taffy_gen_lib::template::encode_query;
///
/// assert_eq!(encode_query(&json!({"a": 1, "b": "x y"})), "?a=1&b=x%20y");
/// assert_eq!(encode_query(&json!({})), "");
/// ```
pub fn encode_query(data: &Value) -> String {
    let Some(object) = data.as_object() else {
        return String::new();
    };

    let pairs: Vec<String> = object
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_component(key),
                encode_component(&query_value(value))
            )
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// String form of a query value, following JavaScript's `String(value)`.
///
/// Integral floats drop their fraction, objects become `[object Object]`,
/// and `null` array elements join as empty strings.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                if f == 0.0 {
                    "0".to_string()
                } else {
                    format!("{f:.0}")
                }
            }
            _ => n.to_string(),
        },
        Value::Object(_) => "[object Object]".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => query_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
