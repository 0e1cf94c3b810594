//! Array element type constraints
//!
//! This module defines the trait that constrains what types a typed view
//! may expose over host array storage.

use crate::kinds::{ElementKind, TypeOid};

/// Trait for types that can be viewed in place inside a host array
///
/// Element types must be plain old data so that reading and writing them
/// through a raw pointer into foreign memory is sound for every bit
/// pattern the host can store.
pub trait ArrayElement: bytemuck::Pod + PartialEq + core::fmt::Debug + Send + Sync {
    /// Element kind this Rust type corresponds to
    fn element_kind() -> ElementKind;

    /// Catalog identifier of the element type
    fn type_oid() -> TypeOid {
        Self::element_kind().oid()
    }

    /// Size in bytes of one element
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }
}

impl ArrayElement for f64 {
    fn element_kind() -> ElementKind {
        ElementKind::Float64
    }
}
