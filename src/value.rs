//! Field values — the scalar cell type and the deduplicated value set
//!
//! Tables hold loosely-typed device output: interface names, prefixes,
//! metrics. Cells are modeled as a tagged scalar with one deliberate
//! equality rule: numbers compare by value, so `5` and `5.0` are the same
//! field. Text never equals a number, even when it spells one.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single table cell
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Bit pattern used for numeric equality and hashing.
///
/// Collapses `-0.0` into `0.0` and every NaN into one representation, so
/// equal-by-value numbers always land in the same hash bucket.
fn canonical_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => state.write_u8(0),
            Value::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            }
            Value::Number(n) => {
                state.write_u8(2);
                state.write_u64(canonical_bits(*n));
            }
            Value::Text(s) => {
                state.write_u8(3);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl Value {
    /// Convert a scalar JSON value into a cell.
    ///
    /// Arrays and objects are not valid cells; persisted snapshots carry
    /// them only at the table level.
    pub fn from_json(v: &serde_json::Value) -> Result<Value> {
        match v {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| Error::Format(format!("unrepresentable number: {}", n))),
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            other => Err(Error::Format(format!(
                "expected a scalar cell, got: {}",
                other
            ))),
        }
    }

    /// Persisted JSON form of the cell.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// A deduplicated set of values
///
/// Aggregation collapses the rows of one group into a set of distinct
/// values per column. Insertion order is preserved for display, but
/// equality and hashing are order-independent: `{a, b}` equals `{b, a}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ValueSet(Vec<Value>);

impl ValueSet {
    pub fn new() -> Self {
        ValueSet(Vec::new())
    }

    pub fn singleton(value: Value) -> Self {
        ValueSet(vec![value])
    }

    /// Insert a value; returns false if it was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.0.contains(&value) {
            false
        } else {
            self.0.push(value);
            true
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        // Both sides are deduplicated, so same size + subset is enough.
        self.0.len() == other.0.len() && self.0.iter().all(|v| other.contains(v))
    }
}

impl Eq for ValueSet {}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for v in iter {
            set.insert(v);
        }
        set
    }
}

impl fmt::Display for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<_> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "{{{}}}", items.join(", "))
    }
}

/// Order-independent combined hash over a sequence of values.
fn set_hash<'a, I: Iterator<Item = &'a Value>>(values: I, state: &mut impl Hasher) {
    let mut acc: u64 = 0;
    let mut count: usize = 0;
    for v in values {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        acc = acc.wrapping_add(h.finish());
        count += 1;
    }
    state.write_u64(acc);
    state.write_usize(count);
}

impl Hash for ValueSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        set_hash(self.0.iter(), state);
    }
}

/// A cell of a grouped table
///
/// Grouping columns keep their single common value; every other column is
/// aggregated into the set of distinct values seen across the group.
/// Equality is singleton-aware: `One(x)` equals `Many({x})`, so tables
/// grouped with different column lists still compare sensibly.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Field {
    One(Value),
    Many(ValueSet),
}

impl Field {
    pub fn values(&self) -> std::slice::Iter<'_, Value> {
        match self {
            Field::One(v) => std::slice::from_ref(v).iter(),
            Field::Many(set) => set.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Field::One(_) => 1,
            Field::Many(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Field::One(a), Field::One(b)) => a == b,
            (Field::Many(a), Field::Many(b)) => a == b,
            (Field::One(a), Field::Many(b)) | (Field::Many(b), Field::One(a)) => {
                b.len() == 1 && b.contains(a)
            }
        }
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with the singleton-aware equality above, so a Field
        // always hashes as the value set it denotes.
        set_hash(self.values(), state);
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::One(v) => write!(f, "{}", v),
            Field::Many(set) => write!(f, "{}", set),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn text(s: &str) -> Value {
        Value::Text(s.into())
    }

    #[rstest]
    #[case(Value::Number(5.0), Value::Number(5.0), true)]
    #[case(Value::Number(5.0), Value::Number(5.000), true)]
    #[case(Value::Number(0.0), Value::Number(-0.0), true)]
    #[case(Value::Number(5.0), Value::Number(6.0), false)]
    #[case(Value::Number(5.0), Value::Text("5".into()), false)]
    #[case(Value::Text("up".into()), Value::Text("up".into()), true)]
    #[case(Value::Null, Value::Null, true)]
    #[case(Value::Bool(true), Value::Bool(false), false)]
    fn value_equality(#[case] a: Value, #[case] b: Value, #[case] equal: bool) {
        assert_eq!(a == b, equal);
    }

    #[test]
    fn nan_is_self_equal() {
        // Set membership needs reflexive equality even for NaN.
        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn equal_values_hash_alike() {
        fn h(v: &Value) -> u64 {
            let mut hasher = DefaultHasher::new();
            v.hash(&mut hasher);
            hasher.finish()
        }
        assert_eq!(h(&Value::Number(0.0)), h(&Value::Number(-0.0)));
        assert_eq!(h(&Value::Number(5.0)), h(&Value::Number(5.0)));
    }

    #[test]
    fn value_set_deduplicates() {
        let mut set = ValueSet::new();
        assert!(set.insert(text("1.1.1.1")));
        assert!(!set.insert(text("1.1.1.1")));
        assert!(set.insert(text("2.2.2.2")));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn value_set_equality_ignores_order() {
        let a: ValueSet = [text("x"), text("y")].into_iter().collect();
        let b: ValueSet = [text("y"), text("x")].into_iter().collect();
        assert_eq!(a, b);

        let c: ValueSet = [text("x")].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn value_set_numeric_membership() {
        let set: ValueSet = [Value::Number(5.0)].into_iter().collect();
        assert!(set.contains(&Value::Number(5.0)));
        assert!(!set.contains(&Value::Text("5".into())));
    }

    #[test]
    fn field_singleton_equivalence() {
        let one = Field::One(text("Eth1"));
        let many = Field::Many(ValueSet::singleton(text("Eth1")));
        assert_eq!(one, many);

        let wider = Field::Many([text("Eth1"), text("Eth2")].into_iter().collect());
        assert_ne!(one, wider);
    }

    #[test]
    fn field_hash_matches_equality() {
        fn h(f: &Field) -> u64 {
            let mut hasher = DefaultHasher::new();
            f.hash(&mut hasher);
            hasher.finish()
        }
        let one = Field::One(text("Eth1"));
        let many = Field::Many(ValueSet::singleton(text("Eth1")));
        assert_eq!(h(&one), h(&many));
    }

    #[test]
    fn from_json_scalars() {
        let v = Value::from_json(&serde_json::json!(24)).unwrap();
        assert_eq!(v, Value::Number(24.0));
        let v = Value::from_json(&serde_json::json!("10.0.0.0")).unwrap();
        assert_eq!(v, Value::Text("10.0.0.0".into()));
        assert!(Value::from_json(&serde_json::json!([1, 2])).is_err());
    }
}
