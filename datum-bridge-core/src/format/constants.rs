//! Layout constants and builtin type identifiers of the host

/// Fixed part of the array header: total_len, ndim, data_offset, elem_type
pub const ARRAY_HEADER_SIZE: usize = 16;

/// Bytes per dimension entry (length plus lower bound)
pub const DIMENSION_ENTRY_SIZE: usize = 8;

/// Alignment of the array data region
pub const DATA_ALIGNMENT: usize = 8;

/// Maximum number of dimensions the host allows
pub const MAX_DIMENSIONS: usize = 6;

/// Builtin catalog identifiers
pub mod oid {
    use crate::kinds::TypeOid;

    pub const BOOL: TypeOid = TypeOid(16);
    pub const INT8: TypeOid = TypeOid(20);
    pub const INT2: TypeOid = TypeOid(21);
    pub const INT4: TypeOid = TypeOid(23);
    pub const TEXT: TypeOid = TypeOid(25);
    pub const FLOAT4: TypeOid = TypeOid(700);
    pub const FLOAT8: TypeOid = TypeOid(701);
    pub const RECORD: TypeOid = TypeOid(2249);

    pub const INT4_ARRAY: TypeOid = TypeOid(1007);
    pub const TEXT_ARRAY: TypeOid = TypeOid(1009);
    pub const FLOAT4_ARRAY: TypeOid = TypeOid(1021);
    pub const FLOAT8_ARRAY: TypeOid = TypeOid(1022);
}
