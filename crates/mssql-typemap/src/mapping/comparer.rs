//! Value comparers used for change detection.
//!
//! Each mapping carries one. Binary values compare by content and are
//! snapshotted by deep copy. Vectors compare by buffer identity: two vectors
//! with equal elements in separate buffers are different values.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::core::SqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueComparer {
    /// Value equality.
    Default,
    /// Content equality over byte buffers.
    Bytes,
    /// Same buffer address and length.
    BufferIdentity,
}

impl ValueComparer {
    pub fn equals(&self, left: &SqlValue<'_>, right: &SqlValue<'_>) -> bool {
        match (self, left, right) {
            (ValueComparer::Bytes, SqlValue::Bytes(a), SqlValue::Bytes(b)) => a[..] == b[..],
            (ValueComparer::BufferIdentity, SqlValue::Vector(a), SqlValue::Vector(b)) => {
                std::ptr::eq(a.as_ptr(), b.as_ptr()) && a.len() == b.len()
            }
            (_, SqlValue::F64(a), SqlValue::F64(b)) => a == b || (a.is_nan() && b.is_nan()),
            (_, SqlValue::F32(a), SqlValue::F32(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => left == right,
        }
    }

    /// Hash consistent with [`ValueComparer::equals`].
    pub fn hash_code(&self, value: &SqlValue<'_>) -> u64 {
        let mut hasher = DefaultHasher::new();
        match (self, value) {
            (ValueComparer::Bytes, SqlValue::Bytes(bytes)) => bytes[..].hash(&mut hasher),
            (ValueComparer::BufferIdentity, SqlValue::Vector(v)) => {
                (v.as_ptr() as usize).hash(&mut hasher);
                v.len().hash(&mut hasher);
            }
            (_, SqlValue::F64(v)) => {
                "F64".hash(&mut hasher);
                canonical_f64_bits(*v).hash(&mut hasher);
            }
            (_, SqlValue::F32(v)) => {
                "F32".hash(&mut hasher);
                canonical_f32_bits(*v).hash(&mut hasher);
            }
            _ => format!("{:?}", value).hash(&mut hasher),
        }
        hasher.finish()
    }

    /// Copy of `value` to compare later edits against.
    pub fn snapshot<'a>(&self, value: &SqlValue<'a>) -> SqlValue<'a> {
        match (self, value) {
            (ValueComparer::Bytes, SqlValue::Bytes(bytes)) => {
                SqlValue::Bytes(std::borrow::Cow::Owned(bytes.to_vec()))
            }
            _ => value.clone(),
        }
    }
}

/// `-0.0` folds to `0.0` and every NaN to one pattern, as `equals` treats them.
fn canonical_f64_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

fn canonical_f32_bits(v: f32) -> u32 {
    if v == 0.0 {
        0.0f32.to_bits()
    } else if v.is_nan() {
        f32::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_compare_by_content() {
        let a = SqlValue::from(vec![1u8, 2, 3]);
        let b = SqlValue::from(vec![1u8, 2, 3]);
        assert!(ValueComparer::Bytes.equals(&a, &b));
        assert_eq!(
            ValueComparer::Bytes.hash_code(&a),
            ValueComparer::Bytes.hash_code(&b)
        );
        assert!(!ValueComparer::Bytes.equals(&a, &SqlValue::from(vec![1u8, 2])));
    }

    #[test]
    fn test_bytes_snapshot_is_a_copy() {
        let data = vec![9u8, 8, 7];
        let value = SqlValue::bytes_borrowed(&data);
        let snapshot = ValueComparer::Bytes.snapshot(&value);
        match (&value, &snapshot) {
            (SqlValue::Bytes(a), SqlValue::Bytes(b)) => assert_ne!(a.as_ptr(), b.as_ptr()),
            _ => panic!("expected bytes"),
        }
        assert!(ValueComparer::Bytes.equals(&value, &snapshot));
    }

    #[test]
    fn test_vectors_compare_by_buffer_identity() {
        let data = vec![1.0f32, 2.0, 3.0];
        let copy = data.clone();
        let a = SqlValue::vector_borrowed(&data);
        let same_buffer = SqlValue::vector_borrowed(&data);
        let other_buffer = SqlValue::vector_borrowed(&copy);

        assert!(ValueComparer::BufferIdentity.equals(&a, &same_buffer));
        assert!(!ValueComparer::BufferIdentity.equals(&a, &other_buffer));
        assert!(ValueComparer::Default.equals(&a, &other_buffer));
        assert_eq!(
            ValueComparer::BufferIdentity.hash_code(&a),
            ValueComparer::BufferIdentity.hash_code(&same_buffer)
        );
    }

    #[test]
    fn test_default_treats_nan_as_equal() {
        let nan = SqlValue::F64(f64::NAN);
        assert!(ValueComparer::Default.equals(&nan, &nan.clone()));
        assert!(ValueComparer::Default.equals(&SqlValue::I32(1), &SqlValue::I32(1)));
        assert!(!ValueComparer::Default.equals(&SqlValue::I32(1), &SqlValue::I64(1)));
    }

    #[test]
    fn test_float_hash_agrees_with_equals() {
        let comparer = ValueComparer::Default;
        let zero = SqlValue::F64(0.0);
        let negative_zero = SqlValue::F64(-0.0);
        assert!(comparer.equals(&zero, &negative_zero));
        assert_eq!(comparer.hash_code(&zero), comparer.hash_code(&negative_zero));

        let zero = SqlValue::F32(0.0);
        let negative_zero = SqlValue::F32(-0.0);
        assert!(comparer.equals(&zero, &negative_zero));
        assert_eq!(comparer.hash_code(&zero), comparer.hash_code(&negative_zero));

        let nan = SqlValue::F64(f64::NAN);
        let other_nan = SqlValue::F64(-f64::NAN);
        assert!(comparer.equals(&nan, &other_nan));
        assert_eq!(comparer.hash_code(&nan), comparer.hash_code(&other_nan));

        assert_ne!(
            comparer.hash_code(&SqlValue::F64(1.0)),
            comparer.hash_code(&SqlValue::F64(2.0))
        );
    }
}
