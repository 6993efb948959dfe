use crate::value::Value;
use std::cmp::Ordering;

/// Total canonical comparator used for source-side ordering.
///
/// Ordering rules:
/// 1. Canonical variant rank (`None` sorts first)
/// 2. Numeric variants compare across widths
/// 3. Variant-specific comparison for same-ranked values
///
/// Mixed non-numeric variants are rank-only and deterministic, so a column
/// holding uneven types still sorts stably.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
        return a.total_cmp(&b);
    }

    let rank = canonical_rank(left).cmp(&canonical_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

const fn canonical_rank(value: &Value) -> u8 {
    match value {
        Value::None => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => 2,
        Value::Text(_) => 3,
        Value::List(_) => 4,
    }
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::None, Value::None) => Ordering::Equal,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) => canonical_cmp_list(a, b),
        // numeric pairs are handled by the cross-width path above
        _ => Ordering::Equal,
    }
}

fn canonical_cmp_list(left: &[Value], right: &[Value]) -> Ordering {
    for (a, b) in left.iter().zip(right.iter()) {
        let ord = canonical_cmp(a, b);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len().cmp(&right.len())
}
