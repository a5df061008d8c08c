//! Total ordering over [`Value`].
//!
//! Values of different kinds order by [`TypeTag`]: null, bool, numbers,
//! string, array, object. Numbers compare by numeric value across
//! representations, with two refinements that keep the order total while
//! never equating distinguishable values: a float ties after the integer
//! it equals, and NaN sorts after every number while equaling itself.

use core::cmp::Ordering;
use std::sync::Arc;

use crate::number::ExactNumber;
use crate::value::{ObjectEntry, Value};

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        let own_tag = self.type_tag(false);
        let other_tag = other.type_tag(false);
        if own_tag != other_tag {
            return own_tag.cmp(&other_tag);
        }
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => {
                if Arc::ptr_eq(a, b) {
                    Ordering::Equal
                } else {
                    a.as_bytes().cmp(b.as_bytes())
                }
            }
            (Value::Array(a), Value::Array(b)) => {
                if Arc::ptr_eq(a, b) {
                    Ordering::Equal
                } else {
                    compare_arrays(a, b)
                }
            }
            (Value::Object(a), Value::Object(b)) => {
                if Arc::ptr_eq(a, b) {
                    Ordering::Equal
                } else {
                    compare_objects(a, b)
                }
            }
            _ => compare_numbers(self, other),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

fn compare_arrays(a: &[Value], b: &[Value]) -> Ordering {
    for (left, right) in a.iter().zip(b) {
        let element = left.cmp(right);
        if element != Ordering::Equal {
            return element;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_objects(a: &[ObjectEntry], b: &[ObjectEntry]) -> Ordering {
    for ((left_key, left), (right_key, right)) in a.iter().zip(b) {
        let key = left_key.as_bytes().cmp(right_key.as_bytes());
        if key != Ordering::Equal {
            return key;
        }
        let value = left.cmp(right);
        if value != Ordering::Equal {
            return value;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_numbers(lhs: &Value, rhs: &Value) -> Ordering {
    use Value::{Exact, Float, Int, Uint};
    match (lhs, rhs) {
        (Uint(a), Uint(b)) => a.cmp(b),
        (Int(a), Int(b)) => a.cmp(b),
        (Uint(a), Int(b)) => cmp_u64_i64(*a, *b),
        (Int(a), Uint(b)) => cmp_u64_i64(*b, *a).reverse(),
        (Float { value: a, .. }, Float { value: b, .. }) => cmp_f64(*a, *b),
        (Float { value: a, .. }, Uint(b)) => cmp_f64_u64(*a, *b),
        (Uint(a), Float { value: b, .. }) => cmp_f64_u64(*b, *a).reverse(),
        (Float { value: a, .. }, Int(b)) => cmp_f64_i64(*a, *b),
        (Int(a), Float { value: b, .. }) => cmp_f64_i64(*b, *a).reverse(),
        (Exact(a), Exact(b)) => {
            if Arc::ptr_eq(a, b) {
                Ordering::Equal
            } else {
                a.as_ref().cmp(b.as_ref())
            }
        }
        (Exact(a), Uint(b)) => a.as_ref().cmp(&ExactNumber::from(*b)),
        (Uint(a), Exact(b)) => ExactNumber::from(*a).cmp(b.as_ref()),
        (Exact(a), Int(b)) => a.as_ref().cmp(&ExactNumber::from(*b)),
        (Int(a), Exact(b)) => ExactNumber::from(*a).cmp(b.as_ref()),
        (Exact(a), Float { value: b, .. }) => cmp_exact_f64(a, *b),
        (Float { value: a, .. }, Exact(b)) => cmp_exact_f64(b, *a).reverse(),
        _ => unreachable!("number comparison dispatched on matching type tags"),
    }
}

/// NaN sorts after every number and equals itself.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn cmp_u64_i64(lhs: u64, rhs: i64) -> Ordering {
    if rhs < 0 {
        Ordering::Greater
    } else {
        lhs.cmp(&(rhs as u64))
    }
}

/// A float comparing equal to an integer sorts after it, keeping the
/// two representations distinguishable in the total order.
fn cmp_f64_u64(lhs: f64, rhs: u64) -> Ordering {
    let rhs_approx = rhs as f64;
    if lhs != rhs_approx {
        // NaN lands here and sorts greater.
        return if lhs < rhs_approx {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    let lhs_trunc = lhs as u64;
    if lhs_trunc != rhs {
        return lhs_trunc.cmp(&rhs);
    }
    Ordering::Greater
}

fn cmp_f64_i64(lhs: f64, rhs: i64) -> Ordering {
    let rhs_approx = rhs as f64;
    if lhs != rhs_approx {
        return if lhs < rhs_approx {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    let lhs_trunc = lhs as i64;
    if lhs_trunc != rhs {
        return lhs_trunc.cmp(&rhs);
    }
    Ordering::Greater
}

fn cmp_exact_f64(lhs: &ExactNumber, rhs: f64) -> Ordering {
    match ExactNumber::from_f64(rhs) {
        Ok(exact_rhs) => lhs.cmp(&exact_rhs),
        // Non-finite floats sort by sign, with NaN greatest.
        Err(_) => {
            if rhs == f64::NEG_INFINITY {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn value(input: &str) -> Value {
        parse(input).expect(input)
    }

    #[test]
    fn kinds_order_null_bool_number_string_array_object() {
        let chain = ["null", "false", "true", "1", "\"a\"", "[]", "{}"];
        for window in chain.windows(2) {
            assert!(
                value(window[0]) < value(window[1]),
                "{} vs {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn numbers_order_across_representations() {
        let two_float = Value::from(2.0);
        let two_uint = Value::Uint(2);
        let three_int = Value::Int(-3);
        assert!(three_int < two_uint);
        assert!(two_uint < two_float, "float ties after the equal integer");
        assert!(Value::Uint(3) > two_float);
        assert!(Value::from(1.5) < two_uint);
        assert!(Value::from(2.5) > two_uint);
    }

    #[test]
    fn signed_unsigned_comparison_is_exact_at_the_edges() {
        assert!(Value::Int(-1) < Value::Uint(0));
        assert!(Value::Uint(u64::MAX) > Value::Int(i64::MAX));
        assert_eq!(Value::Uint(7), Value::from(7));
    }

    #[test]
    fn huge_floats_and_integers_compare_by_value() {
        // 2^64 rounds to itself as a float; u64::MAX rounds up to it.
        let two_to_64 = Value::from(18_446_744_073_709_551_616.0);
        assert!(Value::Uint(u64::MAX) < two_to_64);
        let below = Value::from(18_446_744_073_709_549_568.0);
        assert!(below < Value::Uint(u64::MAX));
    }

    #[test]
    fn nan_sorts_after_every_number_and_equals_itself() {
        let nan = Value::from(f64::NAN);
        assert!(nan > Value::from(f64::INFINITY));
        assert!(nan > Value::Uint(u64::MAX));
        assert_eq!(nan, Value::from(f64::NAN));
        assert!(nan < Value::from("text"), "still below strings");
    }

    #[test]
    fn exact_numbers_compare_against_every_representation() {
        let third = Value::from(ExactNumber::parse("0.333333333333333333333").unwrap());
        assert!(third < Value::Uint(1));
        assert!(third > Value::Uint(0));
        assert!(third > Value::from(0.3));
        assert!(third < Value::from(0.4));
        let huge = Value::from(ExactNumber::parse("1e300").unwrap());
        assert!(huge > Value::Uint(u64::MAX));
        assert!(huge < Value::from(f64::INFINITY));
        assert!(huge > Value::from(f64::NEG_INFINITY));
    }

    #[test]
    fn strings_order_by_bytes() {
        assert!(value("\"a\"") < value("\"b\""));
        assert!(value("\"Z\"") < value("\"a\""));
        assert!(value("\"ab\"") < value("\"b\""));
        assert_eq!(value("\"a\""), value("\"a\""));
    }

    #[test]
    fn arrays_order_lexicographically_with_length_tiebreak() {
        assert!(value("[1,2]") < value("[1,3]"));
        assert!(value("[1,2]") < value("[1,2,0]"));
        assert_eq!(value("[1,[2]]"), value("[1,[2]]"));
    }

    #[test]
    fn objects_order_by_sorted_entries() {
        assert!(value("{\"a\":1}") < value("{\"a\":2}"));
        assert!(value("{\"a\":1}") < value("{\"b\":0}"));
        assert!(value("{\"a\":1}") < value("{\"a\":1,\"b\":2}"));
        assert_eq!(value("{\"a\":1,\"b\":2}"), value("{\"b\":2,\"a\":1}"));
    }

    #[test]
    fn shared_bodies_short_circuit_to_equal() {
        let original = value("[1,{\"k\":[null]}]");
        let copy = original.clone();
        assert_eq!(original, copy);
    }

    #[test]
    fn distinguishable_spellings_stay_ordered() {
        let exact_int = Value::from(ExactNumber::parse("5").unwrap());
        let exact_dec = Value::from(ExactNumber::parse("5.0").unwrap());
        assert!(exact_int < exact_dec);
        assert!(Value::Uint(5) < exact_dec);
    }
}
