use std::sync::Arc;

use crate::error::{Error, ErrorKind};
use crate::number::ExactNumber;

mod compare;

/// An object entry. Bodies hold entries sorted by key bytes, without
/// duplicates.
pub type ObjectEntry = (Box<str>, Value);

/// An immutable JSON value.
///
/// Strings, arrays and objects share their bodies through [`Arc`], so
/// cloning any value is cheap and never copies the tree. Edits go
/// through [`crate::modify`], which rebuilds the spine of the tree and
/// shares everything off it.
///
/// Numbers keep four representations: unsigned and signed integers for
/// literals that fit exactly, floats carrying the significant-digit
/// count of their source literal, and [`ExactNumber`] for lossless
/// decimals of any size.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    /// A float plus the number of significant digits its source literal
    /// had. Zero means no literal is known and the encoder's tightness
    /// applies.
    Float { value: f64, sig_digits: u16 },
    /// A negative integer literal in `i64` range.
    Int(i64),
    /// A non-negative integer literal in `u64` range.
    Uint(u64),
    /// A number kept exactly as written.
    Exact(Arc<ExactNumber>),
    String(Arc<str>),
    Array(Arc<[Value]>),
    /// Entries sorted ascending by key bytes, keys unique.
    Object(Arc<[ObjectEntry]>),
}

/// The kind of a [`Value`], ordered for cross-kind comparison:
/// null, then bool, numbers, string, array, object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    Null,
    Bool,
    Number,
    NumberExact,
    NumberInt,
    NumberUint,
    String,
    Array,
    Object,
}

impl Value {
    /// The kind of this value. With `split_subtype` the number
    /// representations are reported separately; without it they all
    /// collapse to [`TypeTag::Number`].
    pub fn type_tag(&self, split_subtype: bool) -> TypeTag {
        let tag = match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Float { .. } => TypeTag::Number,
            Value::Int(_) => TypeTag::NumberInt,
            Value::Uint(_) => TypeTag::NumberUint,
            Value::Exact(_) => TypeTag::NumberExact,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
        };
        if split_subtype {
            tag
        } else {
            match tag {
                TypeTag::NumberExact | TypeTag::NumberInt | TypeTag::NumberUint => TypeTag::Number,
                other => other,
            }
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Float { .. } => "number(float)",
            Value::Int(_) => "number(integer)",
            Value::Uint(_) => "number(integer unsigned)",
            Value::Exact(_) => "number(exact)",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        self.type_tag(false) == TypeTag::Number
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    fn mismatch(&self, op: &'static str) -> Error {
        Error::new(ErrorKind::TypeMismatch {
            op,
            actual: self.kind_name(),
        })
        .with_argument(self.clone())
    }

    pub fn as_bool(&self) -> Result<bool, Error> {
        match self {
            Value::Bool(value) => Ok(*value),
            _ => Err(self.mismatch("as_bool")),
        }
    }

    /// The numeric value as a float, for any number representation.
    pub fn as_f64(&self) -> Result<f64, Error> {
        match self {
            Value::Float { value, .. } => Ok(*value),
            Value::Int(value) => Ok(*value as f64),
            Value::Uint(value) => Ok(*value as f64),
            Value::Exact(number) => Ok(number.as_f64()),
            _ => Err(self.mismatch("as_f64")),
        }
    }

    /// The value as a signed integer. Unsigned values saturate at
    /// `i64::MAX`; exact numbers must be integral; floats never convert.
    pub fn as_i64(&self) -> Result<i64, Error> {
        match self {
            Value::Int(value) => Ok(*value),
            Value::Uint(value) => Ok(i64::try_from(*value).unwrap_or(i64::MAX)),
            Value::Exact(number) if !number.is_decimal() => Ok(number.as_i64()),
            Value::Exact(_) => Err(self.mismatch("as_i64(NON-INT)")),
            _ => Err(self.mismatch("as_i64")),
        }
    }

    /// The value as an unsigned integer. Signed and float values never
    /// convert; exact numbers must be integral and non-negative.
    pub fn as_u64(&self) -> Result<u64, Error> {
        match self {
            Value::Uint(value) => Ok(*value),
            Value::Exact(number) if !number.is_decimal() && !number.is_negative() => {
                Ok(number.as_u64())
            }
            Value::Exact(_) => Err(self.mismatch("as_u64(NON-UINT)")),
            _ => Err(self.mismatch("as_u64")),
        }
    }

    /// The numeric value as an [`ExactNumber`]. Integers convert
    /// losslessly; floats convert through their decimal rendering, which
    /// honors the significant-digit count of their source literal.
    pub fn as_exact(&self) -> Result<Arc<ExactNumber>, Error> {
        match self {
            Value::Exact(number) => Ok(Arc::clone(number)),
            Value::Int(value) => Ok(Arc::new(ExactNumber::from(*value))),
            Value::Uint(value) => Ok(Arc::new(ExactNumber::from(*value))),
            Value::Float { value, sig_digits } => {
                crate::encode::float_to_exact(*value, *sig_digits)
                    .map(Arc::new)
                    .map_err(|err| err.with_argument(self.clone()))
            }
            _ => Err(self.mismatch("as_exact")),
        }
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        match self {
            Value::String(text) => Ok(text),
            _ => Err(self.mismatch("as_str")),
        }
    }

    pub fn as_array(&self) -> Result<&[Value], Error> {
        match self {
            Value::Array(body) => Ok(body),
            _ => Err(self.mismatch("as_array")),
        }
    }

    pub fn as_object(&self) -> Result<&[ObjectEntry], Error> {
        match self {
            Value::Object(body) => Ok(body),
            _ => Err(self.mismatch("as_object")),
        }
    }

    /// The number of elements of an array.
    pub fn len(&self) -> Result<usize, Error> {
        match self {
            Value::Array(body) => Ok(body.len()),
            _ => Err(self.mismatch("len")),
        }
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        self.len().map(|len| len == 0)
    }

    /// The array element at `index`, or an error naming the index and
    /// the array length.
    pub fn element(&self, index: usize) -> Result<&Value, Error> {
        match self {
            Value::Array(body) => body.get(index).ok_or_else(|| {
                Error::new(ErrorKind::ArrayIndex {
                    index,
                    len: body.len(),
                })
                .with_argument(self.clone())
            }),
            _ => Err(self.mismatch("element")),
        }
    }

    /// The object member at `key`, or an error naming the key.
    pub fn member(&self, key: &str) -> Result<&Value, Error> {
        match self {
            Value::Object(body) => object_find(body, key).ok_or_else(|| {
                Error::new(ErrorKind::ObjectKey { key: key.into() }).with_argument(self.clone())
            }),
            _ => Err(self.mismatch("member")),
        }
    }

    /// Look up an object key. Never fails: absent keys and non-object
    /// values both come back as `None`.
    pub fn find(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(body) => object_find(body, key),
            _ => None,
        }
    }

    /// Look up an array index. Never fails.
    pub fn find_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(body) => body.get(index),
            _ => None,
        }
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// The value at `key`, or `default` when it is absent or this is
    /// not an object.
    pub fn get(&self, key: &str, default: Value) -> Value {
        self.find(key).cloned().unwrap_or(default)
    }

    /// The element at `index`, or `default` when it is absent or this
    /// is not an array.
    pub fn get_index(&self, index: usize, default: Value) -> Value {
        self.find_index(index).cloned().unwrap_or(default)
    }

    /// The bool at `key`, or `default` when absent or not a bool.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.find(key)
            .and_then(|value| value.as_bool().ok())
            .unwrap_or(default)
    }

    /// The float at `key`, or `default` when absent or not a number.
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.find(key)
            .and_then(|value| value.as_f64().ok())
            .unwrap_or(default)
    }

    /// The integer at `key`, or `default` when absent or not integral.
    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.find(key)
            .and_then(|value| value.as_i64().ok())
            .unwrap_or(default)
    }

    /// The unsigned integer at `key`, or `default` when absent or not
    /// an unsigned integer.
    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.find(key)
            .and_then(|value| value.as_u64().ok())
            .unwrap_or(default)
    }

    /// The string at `key`, or `default` when absent or not a string.
    pub fn get_str(&self, key: &str, default: &str) -> Arc<str> {
        match self.find(key) {
            Some(Value::String(text)) => Arc::clone(text),
            _ => Arc::from(default),
        }
    }

    /// Build an array value.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(items.into())
    }

    /// Build an object value, canonicalizing the entries: keys sort
    /// ascending by bytes, and the last entry for a repeated key wins.
    pub fn object(entries: Vec<(String, Value)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        Self::object_from_entries(entries)
    }

    pub(crate) fn object_from_entries(mut entries: Vec<ObjectEntry>) -> Self {
        canonicalize(&mut entries);
        Value::Object(entries.into())
    }

    /// A float carrying the significant-digit count of its source
    /// literal, which the encoder honors over its tightness setting.
    pub fn float_with_digits(value: f64, sig_digits: u16) -> Self {
        Value::Float { value, sig_digits }
    }
}

/// Sort entries ascending by key bytes and drop duplicate keys, keeping
/// the last-inserted entry for each key. Already-canonical bodies are
/// left untouched.
pub(crate) fn canonicalize(entries: &mut Vec<ObjectEntry>) {
    let sorted_unique = entries.windows(2).all(|pair| pair[0].0 < pair[1].0);
    if sorted_unique {
        return;
    }
    // Reversing first makes the later insertion the stable-sort survivor.
    entries.reverse();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.dedup_by(|next, kept| next.0 == kept.0);
}

pub(crate) fn object_find<'a>(body: &'a [ObjectEntry], key: &str) -> Option<&'a Value> {
    body.binary_search_by(|(entry_key, _)| entry_key.as_ref().cmp(key))
        .ok()
        .map(|position| &body[position].1)
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float {
            value,
            sig_digits: 0,
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::from(f64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        // Non-negative integers normalize to the unsigned representation.
        if value < 0 {
            Value::Int(value)
        } else {
            Value::Uint(value as u64)
        }
    }
}

macro_rules! impl_from_small_int {
    ($($from:ty),*) => {
        $(impl From<$from> for Value {
            fn from(value: $from) -> Self {
                Value::from(i64::from(value))
            }
        })*
    };
}

impl_from_small_int!(i8, i16, i32, u8, u16, u32);

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Uint(value as u64)
    }
}

impl From<ExactNumber> for Value {
    fn from(number: ExactNumber) -> Self {
        Value::Exact(Arc::new(number))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(Arc::from(text))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(Arc::from(text))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_object() -> Value {
        Value::object(vec![
            ("b".into(), Value::from(2)),
            ("a".into(), Value::from(1)),
            ("c".into(), Value::from("three")),
        ])
    }

    #[test]
    fn object_entries_sort_by_key_bytes() {
        let object = sample_object();
        let keys: Vec<&str> = object
            .as_object()
            .unwrap()
            .iter()
            .map(|(key, _)| key.as_ref())
            .collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn duplicate_keys_keep_the_last_entry() {
        let object = Value::object(vec![
            ("x".into(), Value::from(1)),
            ("y".into(), Value::from(2)),
            ("x".into(), Value::from(3)),
        ]);
        assert_eq!(object.member("x").unwrap(), &Value::from(3));
        assert_eq!(object.as_object().unwrap().len(), 2);
    }

    #[test]
    fn find_never_fails() {
        let object = sample_object();
        assert!(object.find("a").is_some());
        assert!(object.find("missing").is_none());
        assert!(Value::from(5).find("a").is_none());
        assert!(Value::Null.find_index(0).is_none());
    }

    #[test]
    fn member_reports_the_missing_key() {
        let err = sample_object().member("missing").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::ObjectKey { key } if key.as_ref() == "missing"
        ));
        assert!(err.argument().is_some());
    }

    #[test]
    fn element_reports_index_and_length() {
        let array = Value::array(vec![Value::from(1), Value::from(2)]);
        let err = array.element(5).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::ArrayIndex { index: 5, len: 2 }
        ));
    }

    #[test]
    fn typed_getters_substitute_defaults() {
        let object = sample_object();
        assert_eq!(object.get_i64("a", -1), 1);
        assert_eq!(object.get_i64("missing", -1), -1);
        // Wrong type falls back to the default as well.
        assert!(object.get_bool("a", true));
        assert_eq!(object.get_str("c", "fallback").as_ref(), "three");
        assert_eq!(object.get_str("a", "fallback").as_ref(), "fallback");
    }

    #[test]
    fn accessor_mismatch_names_operation_and_kind() {
        let err = Value::from("text").as_bool().unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch {
                op: "as_bool",
                actual: "string"
            }
        ));
    }

    #[test]
    fn signed_accessor_saturates_unsigned() {
        assert_eq!(Value::Uint(u64::MAX).as_i64().unwrap(), i64::MAX);
    }

    #[test]
    fn float_never_converts_to_integer() {
        assert!(Value::from(1.0).as_i64().is_err());
        assert!(Value::from(1.0).as_u64().is_err());
    }

    #[test]
    fn exact_accessors_respect_the_decimal_flag() {
        let integral = Value::from(ExactNumber::parse("123").unwrap());
        assert_eq!(integral.as_i64().unwrap(), 123);
        let decimal = Value::from(ExactNumber::parse("123.0").unwrap());
        assert!(decimal.as_i64().is_err());
        assert_eq!(decimal.as_f64().unwrap(), 123.0);
    }

    #[test]
    fn as_exact_converts_integers_losslessly() {
        let exact = Value::Uint(u64::MAX).as_exact().unwrap();
        assert_eq!(exact.as_u64(), u64::MAX);
        let negative = Value::Int(-7).as_exact().unwrap();
        assert_eq!(negative.as_i64(), -7);
    }

    #[test]
    fn as_exact_honors_the_float_digit_hint() {
        let hinted = Value::float_with_digits(0.30000000000000004, 2);
        assert_eq!(hinted.as_exact().unwrap().to_string(), "3.0e-1");
        let full = Value::from(0.5);
        assert_eq!(full.as_exact().unwrap().to_string(), "5.0e-1");
    }

    #[test]
    fn negative_int_from_impl_stays_signed() {
        assert!(matches!(Value::from(-5), Value::Int(-5)));
        assert!(matches!(Value::from(5), Value::Uint(5)));
    }

    #[test]
    fn clone_shares_the_body() {
        let original = sample_object();
        let copy = original.clone();
        let (Value::Object(a), Value::Object(b)) = (&original, &copy) else {
            panic!("expected objects");
        };
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn type_tags_collapse_without_subtype_split() {
        assert_eq!(Value::Uint(1).type_tag(true), TypeTag::NumberUint);
        assert_eq!(Value::Uint(1).type_tag(false), TypeTag::Number);
        assert_eq!(Value::from(1.0).type_tag(true), TypeTag::Number);
        assert_eq!(Value::Null.type_tag(false), TypeTag::Null);
    }
}
