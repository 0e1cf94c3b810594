//! Native description of a host array

use super::header::ArrayHeader;
use crate::kinds::TypeOid;

/// Everything the bridge needs to know about a decoded array datum
///
/// The descriptor only records where the host put the data. It does not
/// keep the storage alive; the pointer is valid for as long as the host
/// scope that produced the datum.
#[derive(Debug, Clone, Copy)]
pub struct ArrayDescriptor {
    /// Parsed header of the array block
    pub header: ArrayHeader,
    /// Start of the element data region
    pub data: *mut u8,
    /// Bytes available in the data region
    pub data_len: usize,
    /// The host may share this storage (copy-on-write or cached)
    pub shared: bool,
}

impl ArrayDescriptor {
    /// Number of dimensions
    pub const fn ndim(&self) -> i32 {
        self.header.ndim()
    }

    /// Length of each dimension
    pub fn dims(&self) -> &[i32] {
        self.header.dims()
    }

    /// Whether a null bitmap is present
    pub const fn has_nulls(&self) -> bool {
        self.header.has_nulls()
    }

    /// Element type tag recorded by the host
    pub const fn elem_type(&self) -> TypeOid {
        self.header.elem_type()
    }
}
