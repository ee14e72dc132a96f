use itertools::Itertools;
use serde_json::{Number, Value};
use std::cmp::Ordering;

use crate::common::{Fields, SortOrder, SortableFields};
use crate::errors::MonguitoResult;
use crate::filter::Criterion;

/// Read access to the fields of something the query engine can filter and
/// sort: plain [Fields] or a live [crate::collection::Document] handle.
pub trait FieldSource {
    fn read_fields<R>(&self, f: impl FnOnce(&Fields) -> R) -> R;
}

impl FieldSource for Fields {
    fn read_fields<R>(&self, f: impl FnOnce(&Fields) -> R) -> R {
        f(self)
    }
}

/// Returns the elements of `sequence` matching `criterion`, in their
/// original relative order. An absent criterion copies the sequence.
pub fn filter<T: FieldSource + Clone>(sequence: &[T], criterion: Option<&Criterion>) -> Vec<T> {
    match criterion {
        None => sequence.to_vec(),
        Some(criterion) => sequence
            .iter()
            .filter(|item| item.read_fields(|fields| criterion.matches(fields)))
            .cloned()
            .collect(),
    }
}

/// Returns a sorted copy of `sequence` according to a sort expression such
/// as `"seller, total DESC"`.
pub fn sort<T: FieldSource + Clone>(sequence: &[T], expression: &str) -> MonguitoResult<Vec<T>> {
    let sortable_fields = SortableFields::parse(expression)?;
    Ok(sort_by_fields(sequence, &sortable_fields))
}

/// Returns a copy of `sequence` stably sorted by `sortable_fields`.
///
/// The first field is the primary key; later fields break ties. Elements
/// that compare equal on every field keep their input order.
pub fn sort_by_fields<T: FieldSource + Clone>(sequence: &[T], sortable_fields: &SortableFields) -> Vec<T> {
    let order = sortable_fields.sorting_order();
    sequence
        .iter()
        .map(|item| {
            let keys = item.read_fields(|fields| {
                order
                    .iter()
                    .map(|(field, _)| fields.get(field).cloned())
                    .collect::<Vec<Option<Value>>>()
            });
            (keys, item)
        })
        .sorted_by(|(a_keys, _), (b_keys, _)| {
            for ((a, b), (_, direction)) in a_keys.iter().zip(b_keys.iter()).zip(order.iter()) {
                let cmp = compare_values(a.as_ref(), b.as_ref());
                if cmp != Ordering::Equal {
                    return match direction {
                        SortOrder::Ascending => cmp,
                        SortOrder::Descending => cmp.reverse(),
                    };
                }
            }
            Ordering::Equal
        })
        .map(|(_, item)| item.clone())
        .collect()
}

/// First element of `sequence`, if any.
pub fn first_of<T: Clone>(sequence: &[T]) -> Option<T> {
    sequence.first().cloned()
}

/// Last element of `sequence`, if any.
pub fn last_of<T: Clone>(sequence: &[T]) -> Option<T> {
    sequence.last().cloned()
}

/// Strict equality between two JSON values.
///
/// Numbers compare by numeric value, so `1` equals `1.0`. Values of
/// different JSON types are never equal. Arrays and objects compare
/// element by element.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Ordering::Equal,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| strict_equals(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, a)| y.get(key).map(|b| strict_equals(a, b)).unwrap_or(false))
        }
        _ => a == b,
    }
}

/// Total order over optional JSON values used by sorting.
///
/// An absent field sorts before every present value. Present values are
/// ranked `null < bool < number < string < array < object`; within a rank
/// booleans put `false` first, numbers compare numerically, strings
/// lexicographically, arrays element by element, and objects are equal.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            let rank = type_rank(a).cmp(&type_rank(b));
            if rank != Ordering::Equal {
                return rank;
            }
            match (a, b) {
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
                (Value::String(x), Value::String(y)) => x.cmp(y),
                (Value::Array(x), Value::Array(y)) => {
                    for (a, b) in x.iter().zip(y.iter()) {
                        let cmp = compare_values(Some(a), Some(b));
                        if cmp != Ordering::Equal {
                            return cmp;
                        }
                    }
                    x.len().cmp(&y.len())
                }
                _ => Ordering::Equal,
            }
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn as_integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    match (as_integer(x), as_integer(y)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
    }
}
