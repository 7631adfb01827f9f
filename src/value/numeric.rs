//! Boxed numeric values and the capabilities host types can opt into
//!
//! Numerical libraries hand back their own scalar and array types rather
//! than plain integers and floats. [`Numeric`] models that family so it can
//! travel through a [`Value`](super::Value) and be unboxed by the cleaner or
//! encoded by the JSON encoder. Types outside this family implement
//! [`Extension`] and choose which capabilities they expose.

use crate::error::{Error, Result};
use std::fmt;

/// A native scalar recovered from a boxed numeric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl From<bool> for NativeScalar {
    fn from(b: bool) -> Self {
        NativeScalar::Bool(b)
    }
}

impl From<i64> for NativeScalar {
    fn from(n: i64) -> Self {
        NativeScalar::Int(n)
    }
}

impl From<f64> for NativeScalar {
    fn from(x: f64) -> Self {
        NativeScalar::Float(x)
    }
}

/// Capability of unboxing a single-element container into a native scalar
pub trait ScalarExtractable {
    /// Number of elements held by the container
    fn element_count(&self) -> usize;

    /// The single element, or `None` unless the container holds exactly one
    fn item(&self) -> Option<NativeScalar>;
}

/// A host-defined value carried opaquely through [`Value`](super::Value)
pub trait Extension: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &str;

    fn as_scalar(&self) -> Option<&dyn ScalarExtractable> {
        None
    }

    fn to_json(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Element storage of a [`NumericArray`], row-major
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Bool(v) => v.len(),
            ArrayData::Int(v) => v.len(),
            ArrayData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<NativeScalar> {
        match self {
            ArrayData::Bool(v) => v.get(idx).copied().map(NativeScalar::Bool),
            ArrayData::Int(v) => v.get(idx).copied().map(NativeScalar::Int),
            ArrayData::Float(v) => v.get(idx).copied().map(NativeScalar::Float),
        }
    }

    pub fn dtype(&self) -> &'static str {
        match self {
            ArrayData::Bool(_) => "bool",
            ArrayData::Int(_) => "int64",
            ArrayData::Float(_) => "float64",
        }
    }
}

/// An n-dimensional numeric array; shape `[]` is a zero-dimensional scalar
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    shape: Vec<usize>,
    data: ArrayData,
}

impl NumericArray {
    pub fn new(shape: Vec<usize>, data: ArrayData) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::ShapeMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(NumericArray { shape, data })
    }

    /// A zero-dimensional array wrapping one value
    pub fn scalar(value: impl Into<NativeScalar>) -> Self {
        let data = match value.into() {
            NativeScalar::Bool(b) => ArrayData::Bool(vec![b]),
            NativeScalar::Int(n) => ArrayData::Int(vec![n]),
            NativeScalar::Float(x) => ArrayData::Float(vec![x]),
        };
        NumericArray { shape: vec![], data }
    }

    /// A one-dimensional array over `data`
    pub fn vector(data: ArrayData) -> Self {
        NumericArray {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ScalarExtractable for NumericArray {
    fn element_count(&self) -> usize {
        self.len()
    }

    fn item(&self) -> Option<NativeScalar> {
        if self.len() == 1 {
            self.data.get(0)
        } else {
            None
        }
    }
}

/// The numeric-library value family: boxed integers, boxed floats and arrays
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Float(f64),
    Array(NumericArray),
}

impl Numeric {
    pub fn type_name(&self) -> &'static str {
        match self {
            Numeric::Integer(_) => "integer",
            Numeric::Float(_) => "floating",
            Numeric::Array(_) => "ndarray",
        }
    }
}

impl ScalarExtractable for Numeric {
    fn element_count(&self) -> usize {
        match self {
            Numeric::Integer(_) | Numeric::Float(_) => 1,
            Numeric::Array(arr) => arr.element_count(),
        }
    }

    fn item(&self) -> Option<NativeScalar> {
        match self {
            Numeric::Integer(n) => Some(NativeScalar::Int(*n)),
            Numeric::Float(x) => Some(NativeScalar::Float(*x)),
            Numeric::Array(arr) => arr.item(),
        }
    }
}

impl From<NumericArray> for Numeric {
    fn from(arr: NumericArray) -> Self {
        Numeric::Array(arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_must_match_data() {
        let err = NumericArray::new(vec![2, 2], ArrayData::Int(vec![1, 2, 3])).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 4, actual: 3, .. }));

        let arr = NumericArray::new(vec![2, 2], ArrayData::Int(vec![1, 2, 3, 4])).unwrap();
        assert_eq!(arr.shape(), &[2, 2]);
    }

    #[test]
    fn test_item_requires_single_element() {
        assert_eq!(NumericArray::scalar(7i64).item(), Some(NativeScalar::Int(7)));

        // A one-element vector unboxes too, like `ndarray.item()`
        let single = NumericArray::vector(ArrayData::Float(vec![0.5]));
        assert_eq!(single.item(), Some(NativeScalar::Float(0.5)));

        let many = NumericArray::vector(ArrayData::Int(vec![1, 2]));
        assert_eq!(many.item(), None);
        assert_eq!(many.element_count(), 2);

        let empty = NumericArray::vector(ArrayData::Int(vec![]));
        assert_eq!(empty.item(), None);
    }

    #[test]
    fn test_boxed_scalars_are_extractable() {
        assert_eq!(Numeric::Integer(3).item(), Some(NativeScalar::Int(3)));
        assert_eq!(Numeric::Float(1.5).item(), Some(NativeScalar::Float(1.5)));
        assert_eq!(Numeric::Integer(3).type_name(), "integer");
    }
}
