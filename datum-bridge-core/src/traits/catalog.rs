//! Type catalog interface and classification

use crate::kinds::{TypeOid, ValueKind};

/// Lookups the bridge needs from the host's type catalog
pub trait TypeCatalog {
    /// Whether the identifier names a composite row type
    fn is_row_type(&self, type_id: TypeOid) -> bool;

    /// Element type of an array type, `None` for non-array types
    fn element_type_of(&self, type_id: TypeOid) -> Option<TypeOid>;

    /// Whether the identifier names an array type
    fn is_array_type(&self, type_id: TypeOid) -> bool {
        self.element_type_of(type_id).is_some()
    }
}

impl<C: TypeCatalog + ?Sized> TypeCatalog for &C {
    fn is_row_type(&self, type_id: TypeOid) -> bool {
        (**self).is_row_type(type_id)
    }

    fn element_type_of(&self, type_id: TypeOid) -> Option<TypeOid> {
        (**self).element_type_of(type_id)
    }

    fn is_array_type(&self, type_id: TypeOid) -> bool {
        (**self).is_array_type(type_id)
    }
}

/// Classification of a type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Composite row type, passed through opaquely
    Row,
    /// Array type with the given element type
    Array(TypeOid),
    /// Anything else
    Scalar(TypeOid),
}

impl TypeKind {
    /// Shape of values of this kind
    pub const fn value_kind(self) -> ValueKind {
        match self {
            TypeKind::Row => ValueKind::Row,
            TypeKind::Array(_) => ValueKind::Array,
            TypeKind::Scalar(_) => ValueKind::Scalar,
        }
    }
}

/// Classify a type identifier against the catalog
///
/// Row types win over array types; every identifier the catalog knows
/// nothing about is a scalar.
pub fn classify<C: TypeCatalog + ?Sized>(catalog: &C, type_id: TypeOid) -> TypeKind {
    if catalog.is_row_type(type_id) {
        return TypeKind::Row;
    }
    if catalog.is_array_type(type_id) {
        if let Some(element) = catalog.element_type_of(type_id) {
            return TypeKind::Array(element);
        }
    }
    TypeKind::Scalar(type_id)
}
