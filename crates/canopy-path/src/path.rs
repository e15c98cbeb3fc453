//! Parsed path expressions.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::PathError;
use crate::resolve::{resolve, Lookup};

const SEPARATOR: char = '.';

/// A parsed, dot-separated path expression.
///
/// The root is written as `.` (or the empty string); every other path is a
/// `.`-prefixed list of segments such as `.kids.1.name`.
///
/// # Example
///
/// ```
/// use canopy_path::JsonPath;
/// use serde_json::json;
///
/// let path = JsonPath::parse(".kids.1.name").unwrap();
/// assert_eq!(path.segments(), ["kids", "1", "name"]);
///
/// let doc = json!({"kids": [{"name": "dennis"}, {"name": "lisa"}]});
/// assert_eq!(path.resolve(&doc), Some(&json!("lisa")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    segments: Vec<String>,
}

impl JsonPath {
    /// The path addressing the whole document.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from already-split segments.
    ///
    /// Segments are taken verbatim, so keys containing `.` can be addressed
    /// here even though they cannot be written as an expression.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a path expression.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::MissingRoot`] if a non-root expression does not
    /// start with `.`, and [`PathError::EmptySegment`] for `..` or a trailing `.`.
    pub fn parse(expression: &str) -> Result<Self, PathError> {
        if expression.is_empty() || expression == "." {
            return Ok(Self::root());
        }

        let Some(rest) = expression.strip_prefix(SEPARATOR) else {
            return Err(PathError::MissingRoot {
                expression: expression.to_string(),
            });
        };

        let mut segments = Vec::new();
        for (position, segment) in rest.split(SEPARATOR).enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    expression: expression.to_string(),
                    position,
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Returns the segments, root excluded.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Returns the concatenation of `self` and `other`.
    #[must_use]
    pub fn join(&self, other: &JsonPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Resolves this path against `document`.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        resolve(&self.segments, document)
    }

    /// Looks this path up in `document`, keeping a present `null` distinct.
    pub fn lookup<'a>(&self, document: &'a Value) -> Lookup<'a> {
        Lookup::from(self.resolve(document))
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(".");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for JsonPath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_root() {
        assert!(JsonPath::parse(".").unwrap().is_root());
        assert!(JsonPath::parse("").unwrap().is_root());
        assert_eq!(JsonPath::root().len(), 0);
    }

    #[test]
    fn test_parse_segments() {
        let path = JsonPath::parse(".nested.sub").unwrap();
        assert_eq!(path.segments(), ["nested", "sub"]);
        assert_eq!(path.len(), 2);
        assert!(!path.is_root());
    }

    #[test]
    fn test_parse_missing_root() {
        let err = JsonPath::parse("nested.sub").unwrap_err();
        assert!(matches!(err, PathError::MissingRoot { .. }));
    }

    #[test]
    fn test_parse_empty_segments() {
        assert_eq!(
            JsonPath::parse(".a..b").unwrap_err(),
            PathError::EmptySegment {
                expression: ".a..b".to_string(),
                position: 1,
            }
        );
        assert!(matches!(
            JsonPath::parse(".a.").unwrap_err(),
            PathError::EmptySegment { position: 1, .. }
        ));
        assert!(matches!(
            JsonPath::parse("..").unwrap_err(),
            PathError::EmptySegment { position: 0, .. }
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(JsonPath::root().to_string(), ".");
        assert_eq!(JsonPath::parse(".kids.1.name").unwrap().to_string(), ".kids.1.name");
    }

    #[test]
    fn test_from_str() {
        let path: JsonPath = ".key".parse().unwrap();
        assert_eq!(path.segments(), ["key"]);
        assert!(JsonPath::try_from("key").is_err());
    }

    #[test]
    fn test_child_and_join() {
        let kids = JsonPath::parse(".kids").unwrap();
        let second = kids.child("1");
        assert_eq!(second.to_string(), ".kids.1");

        let name = JsonPath::parse(".name").unwrap();
        assert_eq!(second.join(&name).to_string(), ".kids.1.name");
        assert_eq!(JsonPath::root().join(&name), name);
    }

    #[test]
    fn test_from_segments_allows_dotted_keys() {
        let doc = json!({"a.b": 1});
        let path = JsonPath::from_segments(["a.b"]);
        assert_eq!(path.resolve(&doc), Some(&json!(1)));
    }

    #[test]
    fn test_lookup() {
        let doc = json!({"present": null});
        let path = JsonPath::parse(".present").unwrap();
        assert_eq!(path.lookup(&doc), Lookup::FoundNull);
    }
}
