//! Ordered field lists.
//!
//! A [`FieldList`] is a JSON object kept as a sequence of name/value pairs.
//! Member order is preserved exactly as decoded or pushed, duplicates
//! included. Comparison and equality are positional; call [`FieldList::sort`]
//! on both sides first to compare objects regardless of member order.

use crate::builder::{JsonBuilder, JsonSink};
use crate::parser::{ObjParser, ParseError, TokenSource};
use crate::{error::Result, Error, Limits, Value};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A single name/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A list of name/value pairs.
///
/// Names are expected, but not required, to be distinct. A repeated name is
/// kept at its position and only matters to comparison through that position.
#[derive(Debug, Clone, Default)]
pub struct FieldList(Vec<Field>);

impl FieldList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty list with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Append a field.
    pub fn push(&mut self, field: Field) {
        self.0.push(field);
    }

    /// Value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Take the underlying fields.
    pub fn into_inner(self) -> Vec<Field> {
        self.0
    }

    /// Decode a JSON object, keeping member order.
    pub fn from_json(input: &[u8]) -> Result<Self> {
        Self::from_json_with_limits(input, Limits::default())
    }

    /// Decode a JSON object under explicit limits.
    pub fn from_json_with_limits(input: &[u8], limits: Limits) -> Result<Self> {
        let mut parser = ObjParser::with_limits(input, limits);
        Self::from_tokens(&mut parser)
    }

    /// Decode from any source of alternating raw key and value tokens.
    ///
    /// Running out of tokens where a key is expected ends the object. Running
    /// out where a value is expected is [`Error::UnexpectedEof`]. Nothing is
    /// returned on failure.
    pub fn from_tokens<'a, S: TokenSource<'a>>(source: &mut S) -> Result<Self> {
        match decode_fields(source) {
            Ok(fields) => {
                tracing::trace!(fields = fields.len(), "decoded field list");
                Ok(fields)
            }
            Err(err) => {
                tracing::debug!(error = %err, "failed to decode field list");
                Err(err)
            }
        }
    }

    /// Write this list as a JSON object in its current order.
    ///
    /// Values are written in their plain form (see [`Value::to_unstructured`]),
    /// so nested maps come out sorted by name with repeated names collapsed.
    /// Errors from the sink are returned as-is.
    pub fn to_json<W: JsonSink>(&self, w: &mut W) -> Result<()> {
        w.write_byte(b'{');
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                w.write_byte(b',');
            }
            w.write_json(&field.name)?;
            w.write_byte(b':');
            w.write_json(&field.value.to_unstructured()?)?;
        }
        w.write_byte(b'}');
        Ok(())
    }

    /// Encode to JSON bytes.
    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        let mut builder = JsonBuilder::new();
        self.to_json(&mut builder)?;
        Ok(builder.into_bytes())
    }

    /// Encode to a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        let mut builder = JsonBuilder::new();
        self.to_json(&mut builder)?;
        builder.into_string()
    }

    /// Sort by name, byte-wise. Fields with equal names keep their relative
    /// order.
    pub fn sort(&mut self) {
        match self.0.len() {
            0 | 1 => {}
            2 => {
                if self.0[1].name < self.0[0].name {
                    self.0.swap(0, 1);
                }
            }
            _ => self.0.sort_by(|a, b| a.name.cmp(&b.name)),
        }
    }

    /// Sorted copy of this list.
    pub fn sorted(&self) -> Self {
        let mut copy = self.clone();
        copy.sort();
        copy
    }

    /// Whether names are in non-decreasing order.
    pub fn is_sorted_by_name(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0].name <= pair[1].name)
    }

    /// Compare two lists position by position: name first, then value. A
    /// list that runs out first orders first.
    pub fn compare(&self, rhs: &FieldList) -> Ordering {
        compare_fields(self.0.iter(), rhs.0.iter())
    }

    /// True when `self` orders strictly before `rhs`.
    pub fn less(&self, rhs: &FieldList) -> bool {
        self.compare(rhs) == Ordering::Less
    }

    /// Positional equality. Agrees with [`FieldList::compare`] returning
    /// `Equal`.
    pub fn equals(&self, rhs: &FieldList) -> bool {
        if self.0.len() != rhs.0.len() {
            return false;
        }
        self.0
            .iter()
            .zip(&rhs.0)
            .all(|(l, r)| l.name == r.name && l.value.equals(&r.value))
    }
}

fn decode_fields<'a, S: TokenSource<'a>>(source: &mut S) -> Result<FieldList> {
    let mut fields = Vec::new();
    loop {
        let raw_key = match source.parse() {
            Ok(raw) => raw,
            Err(ParseError::EndOfInput) => break,
            Err(err) => return Err(err.into()),
        };
        let raw_value = match source.parse() {
            Ok(raw) => raw,
            Err(ParseError::EndOfInput) => return Err(Error::UnexpectedEof),
            Err(err) => return Err(err.into()),
        };

        let name: String =
            serde_json::from_slice(raw_key).map_err(|e| Error::Parse(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_slice(raw_value).map_err(|e| Error::Parse(e.to_string()))?;

        fields.push(Field {
            name,
            value: Value::from_unstructured(value),
        });
    }
    Ok(FieldList(fields))
}

/// Positional walk shared by list and map comparison.
pub(crate) fn compare_fields<'a, L, R>(mut lhs: L, mut rhs: R) -> Ordering
where
    L: Iterator<Item = &'a Field>,
    R: Iterator<Item = &'a Field>,
{
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let c = l
                    .name
                    .as_bytes()
                    .cmp(r.name.as_bytes())
                    .then_with(|| l.value.compare(&r.value));
                if c != Ordering::Equal {
                    return c;
                }
            }
        }
    }
}

/// References to `fields` in stable name order.
pub(crate) fn sorted_refs(fields: &FieldList) -> Vec<&Field> {
    let mut refs: Vec<&Field> = fields.0.iter().collect();
    refs.sort_by(|a, b| a.name.cmp(&b.name));
    refs
}

impl Deref for FieldList {
    type Target = [Field];

    fn deref(&self) -> &[Field] {
        &self.0
    }
}

impl DerefMut for FieldList {
    fn deref_mut(&mut self) -> &mut [Field] {
        &mut self.0
    }
}

impl From<Vec<Field>> for FieldList {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

impl FromIterator<Field> for FieldList {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FieldList {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl PartialEq for FieldList {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for FieldList {}

impl Ord for FieldList {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for FieldList {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for FieldList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in &self.0 {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FieldListVisitor;

        impl<'de> Visitor<'de> for FieldListVisitor {
            type Value = FieldList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<FieldList, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    fields.push(Field { name, value });
                }
                Ok(FieldList(fields))
            }
        }

        deserializer.deserialize_map(FieldListVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(pairs: &[(&str, i64)]) -> FieldList {
        pairs
            .iter()
            .map(|(name, value)| Field::new(*name, *value))
            .collect()
    }

    fn names(fields: &FieldList) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn decode_keeps_source_order() {
        let fields = FieldList::from_json(br#"{"b":2,"a":1}"#).unwrap();
        assert_eq!(names(&fields), vec!["b", "a"]);
        assert_eq!(fields.get("b"), Some(&Value::Int(2)));
        assert_eq!(fields.get("a"), Some(&Value::Int(1)));
    }

    #[test]
    fn decode_sort_encode() {
        let mut fields = FieldList::from_json(br#"{"b":2,"a":1}"#).unwrap();
        fields.sort();
        assert_eq!(fields, list(&[("a", 1), ("b", 2)]));
        assert_eq!(fields.to_json_string().unwrap(), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn decode_empty_object() {
        let fields = FieldList::from_json(b"{}").unwrap();
        assert!(fields.is_empty());
        assert_eq!(fields.to_json_string().unwrap(), "{}");
    }

    #[test]
    fn decode_missing_value() {
        let result = FieldList::from_json(br#"{"a""#);
        assert_eq!(result.unwrap_err(), Error::UnexpectedEof);

        let result = FieldList::from_json(br#"{"a":"#);
        assert_eq!(result.unwrap_err(), Error::UnexpectedEof);
    }

    #[test]
    fn decode_malformed_key() {
        let err = FieldList::from_json(br#"{a:1}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().starts_with("parsing JSON: "));
    }

    #[test]
    fn decode_malformed_value() {
        let err = FieldList::from_json(br#"{"a":tru}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));

        let err = FieldList::from_json(br#"{"a":[1}}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn decode_bad_key_escape() {
        let err = FieldList::from_json(br#"{"\q":1}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn decode_unescapes_keys() {
        let fields = FieldList::from_json(br#"{"a\u00e9\n":true}"#).unwrap();
        assert_eq!(fields[0].name, "aé\n");
    }

    #[test]
    fn decode_keeps_duplicates() {
        let fields = FieldList::from_json(br#"{"a":1,"b":2,"a":3}"#).unwrap();
        assert_eq!(names(&fields), vec!["a", "b", "a"]);
        assert_eq!(fields.get("a"), Some(&Value::Int(1)));
    }

    #[test]
    fn decode_nested_values() {
        let fields = FieldList::from_json(br#"{"m":{"y":[1,{"k":null}],"x":"s"}}"#).unwrap();
        let nested = fields.get("m").unwrap().as_map().unwrap();
        assert_eq!(names(nested), vec!["x", "y"]);
    }

    #[test]
    fn decode_limits() {
        let limits = Limits {
            max_nesting_depth: 1,
            ..Limits::default()
        };
        assert!(FieldList::from_json_with_limits(br#"{"a":[1]}"#, limits).is_ok());
        let err = FieldList::from_json_with_limits(br#"{"a":[[1]]}"#, limits).unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("nesting depth")));
    }

    #[test]
    fn encode_in_current_order() {
        let fields = list(&[("z", 1), ("a", 2), ("z", 3)]);
        assert_eq!(fields.to_json_string().unwrap(), r#"{"z":1,"a":2,"z":3}"#);
    }

    #[test]
    fn encode_escapes_names() {
        let fields: FieldList = vec![Field::new("q\"\\", "v\n")].into();
        assert_eq!(fields.to_json_string().unwrap(), r#"{"q\"\\":"v\n"}"#);
    }

    #[test]
    fn encode_nested_maps_in_plain_form() {
        let nested: FieldList = vec![
            Field::new("y", 1),
            Field::new("x", 2),
            Field::new("y", 3),
        ]
        .into();
        let fields: FieldList = vec![Field::new("m", nested)].into();
        assert_eq!(fields.to_json_string().unwrap(), r#"{"m":{"x":2,"y":3}}"#);
    }

    #[test]
    fn capacity_and_inner_fields() {
        let mut fields = FieldList::with_capacity(2);
        assert!(fields.is_empty());
        fields.push(Field::new("b", 1));
        fields.push(Field::new("a", 2));
        fields.sort();
        let inner = fields.into_inner();
        assert_eq!(inner, vec![Field::new("a", 2), Field::new("b", 1)]);
    }

    #[test]
    fn encode_error_propagates() {
        let fields: FieldList = vec![Field::new("a", 1), Field::new("b", f64::NAN)].into();
        let mut builder = JsonBuilder::new();
        let err = fields.to_json(&mut builder).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert_eq!(builder.as_bytes(), br#"{"a":1,"b":"#);
    }

    #[test]
    fn sort_small_lists() {
        let mut empty = FieldList::new();
        empty.sort();
        assert!(empty.is_empty());

        let mut one = list(&[("x", 1)]);
        one.sort();
        assert_eq!(names(&one), vec!["x"]);

        let mut two = list(&[("b", 1), ("a", 2)]);
        two.sort();
        assert_eq!(two, list(&[("a", 2), ("b", 1)]));

        let mut tied = list(&[("a", 1), ("a", 2)]);
        tied.sort();
        assert_eq!(tied, list(&[("a", 1), ("a", 2)]));
    }

    #[test]
    fn sort_is_stable() {
        let mut fields = list(&[("b", 1), ("a", 2), ("b", 3), ("a", 4), ("c", 5)]);
        fields.sort();
        assert_eq!(
            fields,
            list(&[("a", 2), ("a", 4), ("b", 1), ("b", 3), ("c", 5)])
        );
    }

    #[test]
    fn sort_is_bytewise() {
        let mut fields = list(&[("a", 1), ("B", 2), ("é", 3), ("_", 4)]);
        fields.sort();
        assert_eq!(names(&fields), vec!["B", "_", "a", "é"]);
        assert!(fields.is_sorted_by_name());
    }

    #[test]
    fn sorted_leaves_original() {
        let fields = list(&[("b", 1), ("a", 2)]);
        let sorted = fields.sorted();
        assert_eq!(names(&fields), vec!["b", "a"]);
        assert_eq!(names(&sorted), vec!["a", "b"]);
    }

    #[test]
    fn compare_prefix_is_less() {
        let short = list(&[("a", 1)]);
        let long = list(&[("a", 1), ("b", 2)]);
        assert_eq!(short.compare(&long), Ordering::Less);
        assert_eq!(long.compare(&short), Ordering::Greater);
        assert!(short.less(&long));
        assert!(!long.less(&short));
    }

    #[test]
    fn compare_names_before_values() {
        let a = list(&[("a", 100)]);
        let b = list(&[("b", 0)]);
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn compare_values_when_names_match() {
        let a = list(&[("a", 1), ("b", 5)]);
        let b = list(&[("a", 1), ("b", 6)]);
        assert_eq!(a.compare(&b), Ordering::Less);
        assert!(!a.equals(&b));
    }

    #[test]
    fn compare_is_positional() {
        let ab = list(&[("a", 1), ("b", 2)]);
        let ba = list(&[("b", 2), ("a", 1)]);
        assert_ne!(ab.compare(&ba), Ordering::Equal);
        assert!(!ab.equals(&ba));
        assert_eq!(ab.sorted().compare(&ba.sorted()), Ordering::Equal);
        assert!(ab.sorted().equals(&ba.sorted()));
    }

    #[test]
    fn compare_empty() {
        let empty = FieldList::new();
        assert_eq!(empty.compare(&FieldList::new()), Ordering::Equal);
        assert!(empty.less(&list(&[("a", 1)])));
    }

    #[test]
    fn equals_length_mismatch() {
        assert!(!list(&[("a", 1)]).equals(&list(&[("a", 1), ("a", 1)])));
    }

    #[test]
    fn equals_mixed_numbers() {
        let ints: FieldList = vec![Field::new("a", 2)].into();
        let floats: FieldList = vec![Field::new("a", 2.0)].into();
        assert!(ints.equals(&floats));
        assert_eq!(ints.compare(&floats), Ordering::Equal);
    }

    #[test]
    fn serde_roundtrip_keeps_order_and_duplicates() {
        let fields = list(&[("b", 1), ("a", 2), ("b", 3)]);
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"b":1,"a":2,"b":3}"#);

        let parsed: FieldList = serde_json::from_str(&json).unwrap();
        assert_eq!(names(&parsed), vec!["b", "a", "b"]);
        assert_eq!(parsed, fields);
    }

    #[test]
    fn deserialize_rejects_non_objects() {
        assert!(serde_json::from_str::<FieldList>("[1,2]").is_err());
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_scalar() -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(Value::Int),
                // quarters are exact in binary and in short decimal form
                (-4000i32..4000).prop_map(|n| Value::Float(f64::from(n) / 4.0)),
                "[a-c]{0,3}".prop_map(Value::String),
                "\\PC{0,4}".prop_map(Value::String),
            ]
        }

        fn arb_value() -> impl Strategy<Value = Value> {
            arb_scalar().prop_recursive(3, 24, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                    // decoded objects carry unique names, so generate them that way
                    prop::collection::btree_map("[a-c]{1,2}", inner, 0..4).prop_map(|m| {
                        Value::Map(m.into_iter().map(|(k, v)| Field::new(k, v)).collect())
                    }),
                ]
            })
        }

        fn arb_fields() -> impl Strategy<Value = FieldList> {
            prop::collection::vec(("[a-d]{0,2}", arb_value()), 0..6).prop_map(|pairs| {
                pairs
                    .into_iter()
                    .map(|(name, value)| Field::new(name, value))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn prop_compare_antisymmetric(a in arb_fields(), b in arb_fields()) {
                prop_assert_eq!(a.compare(&b), b.compare(&a).reverse());
            }

            #[test]
            fn prop_compare_reflexive(a in arb_fields()) {
                prop_assert_eq!(a.compare(&a.clone()), Ordering::Equal);
                prop_assert!(a.equals(&a.clone()));
            }

            #[test]
            fn prop_equals_matches_compare(a in arb_fields(), b in arb_fields()) {
                prop_assert_eq!(a.equals(&b), a.compare(&b) == Ordering::Equal);
                let (sa, sb) = (a.sorted(), b.sorted());
                prop_assert_eq!(sa.equals(&sb), sa.compare(&sb) == Ordering::Equal);
            }

            #[test]
            fn prop_less_matches_compare(a in arb_fields(), b in arb_fields()) {
                prop_assert_eq!(a.less(&b), a.compare(&b) == Ordering::Less);
            }

            #[test]
            fn prop_compare_transitive(mut lists in prop::collection::vec(arb_fields(), 3..6)) {
                lists.sort();
                for i in 0..lists.len() {
                    for j in i + 1..lists.len() {
                        prop_assert_ne!(lists[i].compare(&lists[j]), Ordering::Greater);
                    }
                }
            }

            #[test]
            fn prop_prefix_orders_first(a in arb_fields(), extra in arb_fields()) {
                prop_assume!(!extra.is_empty());
                let mut longer = a.clone();
                for field in extra {
                    longer.push(field);
                }
                prop_assert_eq!(a.compare(&longer), Ordering::Less);
            }

            #[test]
            fn prop_sort_idempotent(a in arb_fields()) {
                let once = a.sorted();
                let twice = once.sorted();
                prop_assert!(once.is_sorted_by_name());
                prop_assert_eq!(names(&once), names(&twice));
                prop_assert!(once.equals(&twice));
            }

            #[test]
            fn prop_sort_stable(names_in in prop::collection::vec("[a-c]{0,1}", 0..12)) {
                let fields: FieldList = names_in
                    .iter()
                    .enumerate()
                    .map(|(i, name)| Field::new(name.clone(), i as i64))
                    .collect();
                let sorted = fields.sorted();
                for pair in sorted.windows(2) {
                    if pair[0].name == pair[1].name {
                        prop_assert!(pair[0].value.less(&pair[1].value));
                    }
                }
            }

            #[test]
            fn prop_json_roundtrip(a in arb_fields()) {
                let bytes = a.to_json_vec().unwrap();
                let decoded = FieldList::from_json(&bytes).unwrap();
                prop_assert!(
                    decoded.equals(&a),
                    "{} decoded to {:?}",
                    String::from_utf8_lossy(&bytes),
                    decoded
                );
            }
        }
    }
}
