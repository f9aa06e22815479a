//! Dataset values: typed, shaped arrays.
//!
//! A [`Value`] is a flat element buffer tagged with an element kind plus a
//! shape (row-major). Scalars are rank-0 arrays. The tagged representation is
//! what lets the comparator pick a per-kind equality strategy (exact for
//! integers, strings, and booleans; tolerance-based for floats).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Attributes attached to a dataset or group: name -> value.
pub type Attributes = BTreeMap<String, Value>;

/// The kind of node at a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A container node holding datasets and sub-groups.
    Group,
    /// A named array of typed elements.
    Dataset,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group => write!(f, "group"),
            Self::Dataset => write!(f, "dataset"),
        }
    }
}

/// Element kind of an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Int,
    Float,
    Str,
    Bool,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "str"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

/// Flat element buffer, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Elements {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
    Bool(Vec<bool>),
}

impl Elements {
    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Str(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    /// Returns `true` if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element kind tag.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Int(_) => ElementKind::Int,
            Self::Float(_) => ElementKind::Float,
            Self::Str(_) => ElementKind::Str,
            Self::Bool(_) => ElementKind::Bool,
        }
    }
}

/// A dataset value: shaped, typed array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Value {
    shape: Vec<usize>,
    elements: Elements,
}

impl Value {
    /// Create a value, checking that `shape` holds exactly the buffer length.
    pub fn new(shape: Vec<usize>, elements: Elements) -> StoreResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != elements.len() {
            return Err(StoreError::ShapeLenMismatch {
                shape,
                len: elements.len(),
            });
        }
        Ok(Self { shape, elements })
    }

    /// A rank-0 (scalar) integer.
    pub fn scalar_int(v: i64) -> Self {
        Self {
            shape: vec![],
            elements: Elements::Int(vec![v]),
        }
    }

    /// A rank-0 (scalar) float.
    pub fn scalar_float(v: f64) -> Self {
        Self {
            shape: vec![],
            elements: Elements::Float(vec![v]),
        }
    }

    /// A rank-0 (scalar) string.
    pub fn scalar_str(v: impl Into<String>) -> Self {
        Self {
            shape: vec![],
            elements: Elements::Str(vec![v.into()]),
        }
    }

    /// A rank-0 (scalar) boolean.
    pub fn scalar_bool(v: bool) -> Self {
        Self {
            shape: vec![],
            elements: Elements::Bool(vec![v]),
        }
    }

    /// A one-dimensional integer array.
    pub fn int_1d(v: Vec<i64>) -> Self {
        Self {
            shape: vec![v.len()],
            elements: Elements::Int(v),
        }
    }

    /// A one-dimensional float array.
    pub fn float_1d(v: Vec<f64>) -> Self {
        Self {
            shape: vec![v.len()],
            elements: Elements::Float(v),
        }
    }

    /// A one-dimensional string array.
    pub fn str_1d(v: Vec<String>) -> Self {
        Self {
            shape: vec![v.len()],
            elements: Elements::Str(v),
        }
    }

    /// A one-dimensional boolean array.
    pub fn bool_1d(v: Vec<bool>) -> Self {
        Self {
            shape: vec![v.len()],
            elements: Elements::Bool(v),
        }
    }

    /// The array shape (row-major); empty for scalars.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` for zero-length arrays.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns `true` for rank-0 values.
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// The element kind.
    pub fn kind(&self) -> ElementKind {
        self.elements.kind()
    }

    /// The element buffer.
    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    /// Returns `true` for int or float element kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind(), ElementKind::Int | ElementKind::Float)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn list<T: std::fmt::Display>(f: &mut std::fmt::Formatter<'_>, v: &[T]) -> std::fmt::Result {
            write!(f, "[")?;
            for (i, x) in v.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{x}")?;
            }
            write!(f, "]")
        }
        if self.is_scalar() {
            return match &self.elements {
                Elements::Int(v) => write!(f, "{}", v[0]),
                Elements::Float(v) => write!(f, "{}", v[0]),
                Elements::Str(v) => write!(f, "{:?}", v[0]),
                Elements::Bool(v) => write!(f, "{}", v[0]),
            };
        }
        match &self.elements {
            Elements::Int(v) => list(f, v),
            Elements::Float(v) => list(f, v),
            Elements::Str(v) => list(f, v),
            Elements::Bool(v) => list(f, v),
        }
    }
}
