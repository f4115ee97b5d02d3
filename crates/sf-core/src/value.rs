//! Dynamically tagged values flowing through a stream.
//!
//! | Variant | Rust type |
//! |---------|-----------|
//! | integer | `Value::Int(i64)` |
//! | float | `Value::Float(f64)` |
//! | text | `Value::Text(String)` |
//! | boolean | `Value::Bool(bool)` |
//! | null | `Value::Null` |
//! | ordered composite | `Value::Composite(Composite)` |
//! | opaque reference | `Value::Ref(Reference)` |
//!
//! Values are never mutated by the engine. Equality is not derived: `==`
//! delegates to [`crate::equivalent`] in strict mode.

use crate::equality::{equivalent, EqualityMode};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Key of a composite entry: positional or named.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Index(i as i64)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as i64)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(s) => write!(f, "{s}"),
        }
    }
}

/// Ordered sequence of key/value entries. Keys are unique.
#[derive(Debug, Clone, Default)]
pub struct Composite {
    entries: Vec<(Key, Value)>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional composite `[0 => a, 1 => b, ...]`.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::from(i), v.into()))
            .collect();
        Self { entries }
    }

    /// Composite from explicit keys. A repeated key overwrites the earlier
    /// value in place.
    pub fn record<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut c = Self::new();
        for (k, v) in pairs {
            c.insert(k.into(), v.into());
        }
        c
    }

    /// Append under the next free positional key.
    pub fn push(&mut self, value: impl Into<Value>) {
        let next = self
            .entries
            .iter()
            .filter_map(|(k, _)| match k {
                Key::Index(i) => Some(*i + 1),
                Key::Name(_) => None,
            })
            .max()
            .unwrap_or(0);
        self.entries.push((Key::Index(next), value.into()));
    }

    pub fn insert(&mut self, key: Key, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(Key, Value)] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// True when keys are exactly `0..len` in order.
    pub fn is_list(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (k, _))| *k == Key::Index(i as i64))
    }
}

/// Iterates the values, dropping keys.
impl IntoIterator for Composite {
    type Item = Value;
    type IntoIter = std::iter::Map<std::vec::IntoIter<(Key, Value)>, fn((Key, Value)) -> Value>;

    fn into_iter(self) -> Self::IntoIter {
        fn value_of((_, v): (Key, Value)) -> Value {
            v
        }
        self.entries.into_iter().map(value_of as fn((Key, Value)) -> Value)
    }
}

impl<V: Into<Value>> FromIterator<V> for Composite {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Composite::list(iter)
    }
}

/// An object-like entity with a class tag and named fields.
#[derive(Debug)]
pub struct Object {
    class: String,
    fields: Vec<(String, Value)>,
}

/// Shared handle to an [`Object`]. Clones keep the instance identity;
/// [`Reference::new`] always creates a new instance.
#[derive(Debug, Clone)]
pub struct Reference(Rc<Object>);

impl Reference {
    pub fn new<I, K, V>(class: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self(Rc::new(Object { class: class.into(), fields }))
    }

    pub fn class(&self) -> &str {
        &self.0.class
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.0.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn same_instance(&self, other: &Reference) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Int-or-float view of a numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Exact for two integers, IEEE comparison otherwise.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::Int(i as i64)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

/// Parse text that looks entirely like a number, surrounding whitespace
/// allowed: `"12"`, `" -3.5"`, `"1e3"`, `".5"`. Rejects `"inf"`, `"nan"`,
/// hex and empty input.
pub fn parse_numeric(text: &str) -> Option<Number> {
    let s = text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    let mut is_float = false;
    if i < bytes.len() && bytes[i] == b'.' {
        is_float = true;
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        is_float = true;
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }
    if i != bytes.len() {
        return None;
    }
    if !is_float {
        if let Ok(n) = s.parse::<i64>() {
            return Some(Number::Int(n));
        }
    }
    s.parse::<f64>().ok().map(Number::Float)
}

/// A dynamically tagged value.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Null,
    Composite(Composite),
    Ref(Reference),
}

impl Value {
    /// Positional composite shorthand.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Composite(Composite::list(values))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::Composite(_) => "composite",
            Value::Ref(_) => "reference",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Composite(_) | Value::Ref(_))
    }

    /// Numeric view of `Int` and `Float` only. Text is never coerced here.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Value::Composite(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Falsy: null, false, 0, 0.0, "", "0" and the empty composite.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty() && s != "0",
            Value::Bool(b) => *b,
            Value::Null => false,
            Value::Composite(c) => !c.is_empty(),
            Value::Ref(_) => true,
        }
    }

    /// JSON rendering. Non-finite floats become `null`; references become
    /// objects carrying an `"@class"` entry.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Int(i) => JsonValue::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Null => JsonValue::Null,
            Value::Composite(c) if c.is_list() => {
                JsonValue::Array(c.values().map(Value::to_json).collect())
            }
            Value::Composite(c) => JsonValue::Object(
                c.entries()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Value::Ref(r) => {
                let mut map = serde_json::Map::new();
                map.insert("@class".into(), JsonValue::String(r.class().to_string()));
                for (k, v) in r.fields() {
                    map.insert(k.clone(), v.to_json());
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equivalent(self, other, EqualityMode::Strict)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
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

impl From<Composite> for Value {
    fn from(c: Composite) -> Self {
        Value::Composite(c)
    }
}

impl From<Reference> for Value {
    fn from(r: Reference) -> Self {
        Value::Ref(r)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(v: Option<V>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Array(items) => Value::Composite(Composite::list(items)),
            JsonValue::Object(map) => Value::Composite(Composite::record(map)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::Composite(c) => {
                write!(f, "[")?;
                for (i, (k, v)) in c.entries().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match k {
                        Key::Index(_) if c.is_list() => write!(f, "{v}")?,
                        _ => write!(f, "{k} => {v}")?,
                    }
                }
                write!(f, "]")
            }
            Value::Ref(r) => {
                write!(f, "{}{{", r.class())?;
                for (i, (k, v)) in r.fields().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
