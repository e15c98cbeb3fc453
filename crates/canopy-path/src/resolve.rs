//! Segment-by-segment resolution against a JSON value tree.

use serde_json::Value;

use crate::JsonPath;

static NULL: Value = Value::Null;

/// Resolves pre-split path segments against `node`.
///
/// One segment is consumed per call; an empty slice returns `node` itself.
/// Objects are indexed by key, arrays by a canonical decimal index (see
/// [`parse_index`]), and scalars cannot be descended into. All failures
/// return `None`.
///
/// The returned value borrows from `node`; nothing is cloned.
///
/// # Example
///
/// ```
/// use canopy_path::resolve;
/// use serde_json::json;
///
/// let doc = json!({"nested": {"sub": "super"}});
/// assert_eq!(resolve(&["nested", "sub"], &doc), Some(&json!("super")));
/// assert_eq!(resolve::<&str>(&[], &doc), Some(&doc));
/// ```
pub fn resolve<'a, S: AsRef<str>>(segments: &[S], node: &'a Value) -> Option<&'a Value> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(node);
    };
    let segment = first.as_ref();

    match node {
        Value::Object(map) => resolve(rest, map.get(segment)?),
        Value::Array(items) => resolve(rest, items.get(parse_index(segment)?)?),
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => None,
    }
}

/// Parses a segment as an array index.
///
/// Only canonical non-negative decimals are accepted: ASCII digits, no sign,
/// no fraction, and no leading zeros other than `"0"` itself.
///
/// ```
/// use canopy_path::parse_index;
///
/// assert_eq!(parse_index("0"), Some(0));
/// assert_eq!(parse_index("12"), Some(12));
/// assert_eq!(parse_index("012"), None);
/// assert_eq!(parse_index("+1"), None);
/// assert_eq!(parse_index("-1"), None);
/// assert_eq!(parse_index("1.0"), None);
/// ```
pub fn parse_index(segment: &str) -> Option<usize> {
    let bytes = segment.as_bytes();
    match bytes {
        [] => None,
        [b'0'] => Some(0),
        [b'0', ..] => None,
        _ if bytes.iter().all(u8::is_ascii_digit) => segment.parse().ok(),
        _ => None,
    }
}

/// Outcome of a lookup that keeps a present `null` apart from a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The path resolved to a non-null value.
    Found(&'a Value),
    /// The path resolved to an explicit JSON `null`.
    FoundNull,
    /// The path could not be resolved.
    NotFound,
}

impl<'a> Lookup<'a> {
    /// Returns the located value; a present `null` yields `Some(&Value::Null)`.
    #[must_use]
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::FoundNull => Some(&NULL),
            Self::NotFound => None,
        }
    }

    /// Returns true if the path resolved, including to `null`.
    #[must_use]
    pub fn is_found(self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// Returns true if the path resolved to an explicit `null`.
    #[must_use]
    pub fn is_null(self) -> bool {
        matches!(self, Self::FoundNull)
    }

    /// Collapses a present `null` into `None`.
    ///
    /// Use this when a `null` field should be treated the same as a
    /// missing one.
    #[must_use]
    pub fn into_option(self) -> Option<&'a Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::FoundNull | Self::NotFound => None,
        }
    }
}

impl<'a> From<Option<&'a Value>> for Lookup<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Null) => Self::FoundNull,
            Some(value) => Self::Found(value),
            None => Self::NotFound,
        }
    }
}

/// Parses `path` and resolves it against `document`.
///
/// A malformed path is treated like any other miss and returns `None`.
pub fn find<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    JsonPath::parse(path).ok()?.resolve(document)
}

/// Parses `path` and looks it up in `document`, keeping found-null distinct.
pub fn lookup<'a>(document: &'a Value, path: &str) -> Lookup<'a> {
    match JsonPath::parse(path) {
        Ok(path) => path.lookup(document),
        Err(_) => Lookup::NotFound,
    }
}
