//! # Field List Engine
//!
//! Ordered JSON field lists with deterministic ordering and equality.
//!
//! A JSON object is held as a [`FieldList`]: a sequence of name/value pairs in
//! the order they were decoded or pushed. Two lists can be compared, tested
//! for equality and sorted into canonical (name-ordered) form, which is what
//! diffing and merging layers build on to treat objects as comparable no
//! matter how their members were originally ordered.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine only sees byte slices and sinks
//! - **Deterministic**: comparison is a total order, and `equals` agrees with it
//! - **Pluggable codecs**: decoding pulls from a [`TokenSource`], encoding
//!   pushes into a [`JsonSink`]
//!
//! ## Core Concepts
//!
//! ### Values
//!
//! [`Value`] is a sum type over everything JSON can hold. Values of different
//! kinds order by a fixed rank; values of the same kind compare structurally.
//!
//! ### Ordering
//!
//! [`FieldList::compare`] walks both lists position by position, names first,
//! then values. It does not sort: call [`FieldList::sort`] (or
//! [`FieldList::sorted`]) on both sides for order-independent comparison.
//! Repeated names are kept and compared by position.
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldlist_engine::{FieldList, Value};
//! use std::cmp::Ordering;
//!
//! // 1. Decode, keeping source order
//! let mut fields = FieldList::from_json(br#"{"b":2,"a":1}"#).unwrap();
//! assert_eq!(fields[0].name, "b");
//!
//! // 2. Sort into canonical form
//! fields.sort();
//! assert_eq!(fields.get("a"), Some(&Value::Int(1)));
//!
//! // 3. Encode
//! assert_eq!(fields.to_json_string().unwrap(), r#"{"a":1,"b":2}"#);
//!
//! // 4. Compare
//! let prefix = FieldList::from_json(br#"{"a":1}"#).unwrap();
//! assert_eq!(prefix.compare(&fields), Ordering::Less);
//! ```

pub mod builder;
pub mod error;
pub mod fields;
pub mod limits;
pub mod parser;
pub mod value;

// Re-export main types at crate root
pub use builder::{JsonBuilder, JsonSink};
pub use error::{Error, Result};
pub use fields::{Field, FieldList};
pub use limits::Limits;
pub use parser::{ObjParser, ParseError, TokenSource};
pub use value::Value;
