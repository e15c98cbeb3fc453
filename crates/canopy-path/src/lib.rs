//! # Canopy Path
//!
//! Dot-separated path lookups over decoded JSON documents.
//!
//! A path expression such as `.kids.1.name` is split on `.`; the empty
//! leading segment marks the document root and is dropped. Each remaining
//! segment is interpreted by the kind of node it is applied to:
//!
//! - an **object** treats the segment as a key (exact, case-sensitive match)
//! - an **array** treats the segment as a zero-based decimal index
//! - a **scalar** cannot be descended into, so the lookup fails
//!
//! Every failure (missing key, bad or out-of-range index, descent into a
//! scalar) collapses into a single "not found" outcome.
//!
//! ## Example
//!
//! ```
//! use canopy_path::{find, JsonPath, Lookup};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "kids": [{"name": "dennis"}, {"name": "lisa"}],
//!     "pet": null
//! });
//!
//! assert_eq!(find(&doc, ".kids.1.name"), Some(&json!("lisa")));
//! assert_eq!(find(&doc, ".kids.5"), None);
//!
//! // A present `null` is not the same as a missing key.
//! let path: JsonPath = ".pet".parse().unwrap();
//! assert_eq!(path.lookup(&doc), Lookup::FoundNull);
//! assert_eq!(canopy_path::lookup(&doc, ".owner"), Lookup::NotFound);
//! ```
//!
//! The lower-level [`resolve`] works on pre-split segments and is what the
//! other entry points delegate to.

#![doc(html_root_url = "https://docs.rs/canopy-path/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod path;
mod resolve;

pub use error::PathError;
pub use path::JsonPath;
pub use resolve::{find, lookup, parse_index, resolve, Lookup};
