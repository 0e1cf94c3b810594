//! Type identifiers and the closed sets of kinds the bridge understands

use crate::format::constants::oid;

/// Handle naming a logical data type in the host's type catalog
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TypeOid(pub u32);

impl TypeOid {
    /// The catalog's "no type" identifier
    pub const INVALID: TypeOid = TypeOid(0);

    /// Check whether this is a real catalog identifier
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u32> for TypeOid {
    fn from(value: u32) -> Self {
        TypeOid(value)
    }
}

impl core::fmt::Display for TypeOid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "oid {}", self.0)
    }
}

/// Shape of a converted value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Array,
    Row,
}

impl core::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValueKind::Scalar => write!(f, "scalar"),
            ValueKind::Array => write!(f, "array"),
            ValueKind::Row => write!(f, "row"),
        }
    }
}

/// Scalar types with a registered decode function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScalarKind {
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl ScalarKind {
    /// All registered scalar kinds
    pub const ALL: [ScalarKind; 6] = [
        ScalarKind::Bool,
        ScalarKind::Int16,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::Float32,
        ScalarKind::Float64,
    ];

    /// Look up the scalar kind for a catalog identifier
    pub const fn from_oid(type_id: TypeOid) -> Option<Self> {
        match type_id {
            oid::BOOL => Some(ScalarKind::Bool),
            oid::INT2 => Some(ScalarKind::Int16),
            oid::INT4 => Some(ScalarKind::Int32),
            oid::INT8 => Some(ScalarKind::Int64),
            oid::FLOAT4 => Some(ScalarKind::Float32),
            oid::FLOAT8 => Some(ScalarKind::Float64),
            _ => None,
        }
    }

    /// Catalog identifier of this kind
    pub const fn oid(self) -> TypeOid {
        match self {
            ScalarKind::Bool => oid::BOOL,
            ScalarKind::Int16 => oid::INT2,
            ScalarKind::Int32 => oid::INT4,
            ScalarKind::Int64 => oid::INT8,
            ScalarKind::Float32 => oid::FLOAT4,
            ScalarKind::Float64 => oid::FLOAT8,
        }
    }

    /// Rust type name of the decoded payload
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int16 => "i16",
            ScalarKind::Int32 => "i32",
            ScalarKind::Int64 => "i64",
            ScalarKind::Float32 => "f32",
            ScalarKind::Float64 => "f64",
        }
    }
}

impl core::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Array element types with a registered view strategy
///
/// Only 64-bit floating point arrays are viewed; every other element type
/// is reported as unmapped by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Float64,
}

impl ElementKind {
    /// Look up the element kind for a catalog identifier
    pub const fn from_oid(type_id: TypeOid) -> Option<Self> {
        match type_id {
            oid::FLOAT8 => Some(ElementKind::Float64),
            _ => None,
        }
    }

    /// Catalog identifier of this element type
    pub const fn oid(self) -> TypeOid {
        match self {
            ElementKind::Float64 => oid::FLOAT8,
        }
    }

    /// Size in bytes of one element
    pub const fn size_bytes(self) -> usize {
        match self {
            ElementKind::Float64 => 8,
        }
    }

    /// Required alignment of the element storage
    pub const fn align_bytes(self) -> usize {
        match self {
            ElementKind::Float64 => core::mem::align_of::<f64>(),
        }
    }
}

impl core::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ElementKind::Float64 => write!(f, "f64"),
        }
    }
}
