//! Host array header layout
//!
//! Arrays are passed as a pointer to a single contiguous block laid out in
//! native byte order:
//!
//! ```text
//! u32 total_len | i32 ndim | i32 data_offset | u32 elem_type
//! i32 dims[ndim] | i32 lower_bounds[ndim]
//! null bitmap (only when data_offset != 0)
//! element data (8-byte aligned)
//! ```
//!
//! A zero `data_offset` means the array has no null bitmap and the data
//! starts right after the dimension entries, rounded up to 8 bytes.

use super::constants::{ARRAY_HEADER_SIZE, DIMENSION_ENTRY_SIZE, MAX_DIMENSIONS};
use crate::error::{BridgeError, Result};
use crate::kinds::TypeOid;
use crate::validation::format::{align_to_8, validate_offset_alignment};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Parsed array header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayHeader {
    total_len: u32,
    ndim: i32,
    data_offset: i32,
    elem_type: TypeOid,
    dims: [i32; MAX_DIMENSIONS],
    lower_bounds: [i32; MAX_DIMENSIONS],
}

impl ArrayHeader {
    /// Default lower bound the host assigns to every dimension
    pub const DEFAULT_LOWER_BOUND: i32 = 1;

    /// Build the header for a fixed-width element array
    ///
    /// Computes the data offset and total length the host would produce for
    /// `dims` elements of `elem_size` bytes each, optionally reserving a null
    /// bitmap.
    pub fn new(
        elem_type: TypeOid,
        dims: &[i32],
        elem_size: usize,
        with_null_bitmap: bool,
    ) -> Result<Self> {
        if dims.len() > MAX_DIMENSIONS || !elem_type.is_valid() {
            return Err(BridgeError::InvalidHeader);
        }

        let mut header = Self {
            total_len: 0,
            ndim: dims.len() as i32,
            data_offset: 0,
            elem_type,
            dims: [0; MAX_DIMENSIONS],
            lower_bounds: [0; MAX_DIMENSIONS],
        };

        for (i, &len) in dims.iter().enumerate() {
            if len < 0 {
                return Err(BridgeError::InvalidHeader);
            }
            header.dims[i] = len;
            header.lower_bounds[i] = Self::DEFAULT_LOWER_BOUND;
        }

        let count = header.element_count()?;
        let mut prefix = Self::fixed_overhead(dims.len());
        if with_null_bitmap {
            prefix += Self::null_bitmap_len(count);
        }
        let data_start = align_to_8(prefix);

        let total = count
            .checked_mul(elem_size)
            .and_then(|bytes| bytes.checked_add(data_start))
            .ok_or(BridgeError::ArraySizeOverflow)?;
        header.total_len = u32::try_from(total).map_err(|_| BridgeError::ArraySizeOverflow)?;

        if with_null_bitmap {
            header.data_offset =
                i32::try_from(data_start).map_err(|_| BridgeError::ArraySizeOverflow)?;
        }

        Ok(header)
    }

    /// Parse a header from the start of an array block
    ///
    /// `bytes` must cover the whole block (`total_len` bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ARRAY_HEADER_SIZE {
            return Err(BridgeError::InsufficientBuffer);
        }

        let total_len = read_u32(bytes, 0);
        let ndim = read_i32(bytes, 4);
        let data_offset = read_i32(bytes, 8);
        let elem_type = TypeOid(read_u32(bytes, 12));

        if (total_len as usize) < ARRAY_HEADER_SIZE {
            return Err(BridgeError::InvalidHeader);
        }
        if bytes.len() < total_len as usize {
            return Err(BridgeError::InsufficientBuffer);
        }
        if ndim < 0 || ndim as usize > MAX_DIMENSIONS || data_offset < 0 {
            return Err(BridgeError::InvalidHeader);
        }
        if !elem_type.is_valid() {
            return Err(BridgeError::InvalidHeader);
        }

        let n = ndim as usize;
        let fixed = Self::fixed_overhead(n);
        if fixed > total_len as usize {
            return Err(BridgeError::InvalidHeader);
        }

        let mut dims = [0; MAX_DIMENSIONS];
        let mut lower_bounds = [0; MAX_DIMENSIONS];
        for i in 0..n {
            dims[i] = read_i32(bytes, ARRAY_HEADER_SIZE + 4 * i);
            lower_bounds[i] = read_i32(bytes, ARRAY_HEADER_SIZE + 4 * (n + i));
            if dims[i] < 0 {
                return Err(BridgeError::InvalidHeader);
            }
        }

        let header = Self {
            total_len,
            ndim,
            data_offset,
            elem_type,
            dims,
            lower_bounds,
        };

        let count = header.element_count()?;
        if header.has_nulls() {
            let minimum = fixed + Self::null_bitmap_len(count);
            if (data_offset as usize) < minimum {
                return Err(BridgeError::InvalidHeader);
            }
            validate_offset_alignment(data_offset as usize, 8)
                .map_err(|_| BridgeError::InvalidHeader)?;
        }
        if header.data_start() > total_len as usize {
            return Err(BridgeError::InvalidHeader);
        }

        Ok(header)
    }

    /// Write the fixed part and dimension entries into `out`
    ///
    /// Returns the number of bytes written. The null bitmap and data region
    /// are left untouched.
    pub fn write_to(&self, out: &mut [u8]) -> Result<usize> {
        let n = self.ndim as usize;
        let len = Self::fixed_overhead(n);
        if out.len() < len {
            return Err(BridgeError::InsufficientBuffer);
        }

        out[0..4].copy_from_slice(&self.total_len.to_ne_bytes());
        out[4..8].copy_from_slice(&self.ndim.to_ne_bytes());
        out[8..12].copy_from_slice(&self.data_offset.to_ne_bytes());
        out[12..16].copy_from_slice(&self.elem_type.0.to_ne_bytes());
        for i in 0..n {
            let dim_at = ARRAY_HEADER_SIZE + 4 * i;
            let lb_at = ARRAY_HEADER_SIZE + 4 * (n + i);
            out[dim_at..dim_at + 4].copy_from_slice(&self.dims[i].to_ne_bytes());
            out[lb_at..lb_at + 4].copy_from_slice(&self.lower_bounds[i].to_ne_bytes());
        }

        Ok(len)
    }

    /// Serialize the fixed part and dimension entries
    #[cfg(feature = "alloc")]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = alloc::vec![0u8; Self::fixed_overhead(self.ndim as usize)];
        // The buffer is sized from ndim, so this cannot fail.
        let _ = self.write_to(&mut bytes);
        bytes
    }

    /// Size of the fixed part plus `ndim` dimension entries
    pub const fn fixed_overhead(ndim: usize) -> usize {
        ARRAY_HEADER_SIZE + DIMENSION_ENTRY_SIZE * ndim
    }

    /// Bytes needed for a null bitmap covering `count` elements
    pub const fn null_bitmap_len(count: usize) -> usize {
        count.div_ceil(8)
    }

    /// Total size of the array block in bytes
    pub const fn total_len(&self) -> usize {
        self.total_len as usize
    }

    /// Declared number of dimensions
    pub const fn ndim(&self) -> i32 {
        self.ndim
    }

    /// Element type tag recorded by the host
    pub const fn elem_type(&self) -> TypeOid {
        self.elem_type
    }

    /// Whether a null bitmap is present
    pub const fn has_nulls(&self) -> bool {
        self.data_offset != 0
    }

    /// Length of each dimension
    pub fn dims(&self) -> &[i32] {
        &self.dims[..self.ndim as usize]
    }

    /// Lower bound of each dimension
    pub fn lower_bounds(&self) -> &[i32] {
        &self.lower_bounds[..self.ndim as usize]
    }

    /// Total number of elements across all dimensions
    pub fn element_count(&self) -> Result<usize> {
        if self.ndim == 0 {
            return Ok(0);
        }
        self.dims().iter().try_fold(1usize, |acc, &len| {
            acc.checked_mul(len as usize)
                .ok_or(BridgeError::ArraySizeOverflow)
        })
    }

    /// Offset of the element data from the start of the block
    pub const fn data_start(&self) -> usize {
        if self.data_offset != 0 {
            self.data_offset as usize
        } else {
            align_to_8(Self::fixed_overhead(self.ndim as usize))
        }
    }

    /// Number of bytes available for element data
    pub const fn data_len(&self) -> usize {
        self.total_len().saturating_sub(self.data_start())
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_ne_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_ne_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::oid;

    fn encode(header: &ArrayHeader) -> [u8; 256] {
        let mut block = [0u8; 256];
        header.write_to(&mut block).unwrap();
        block
    }

    #[test]
    fn test_one_dimensional_layout() {
        let header = ArrayHeader::new(oid::FLOAT8, &[3], 8, false).unwrap();
        assert_eq!(header.ndim(), 1);
        assert_eq!(header.dims(), &[3]);
        assert_eq!(header.lower_bounds(), &[1]);
        assert!(!header.has_nulls());
        // 16 fixed + 8 for one dimension, already aligned
        assert_eq!(header.data_start(), 24);
        assert_eq!(header.total_len(), 24 + 3 * 8);
        assert_eq!(header.data_len(), 24);
    }

    #[test]
    fn test_null_bitmap_layout() {
        let header = ArrayHeader::new(oid::FLOAT8, &[10], 8, true).unwrap();
        assert!(header.has_nulls());
        // 24 + 2 bitmap bytes rounded up to 32
        assert_eq!(header.data_start(), 32);
        assert_eq!(header.total_len(), 32 + 80);
    }

    #[test]
    fn test_parse_round_trip() {
        let header = ArrayHeader::new(oid::FLOAT8, &[2, 3], 8, false).unwrap();
        let block = encode(&header);
        let parsed = ArrayHeader::from_bytes(&block[..header.total_len()]).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.element_count(), Ok(6));
        assert_eq!(parsed.elem_type(), oid::FLOAT8);
    }

    #[test]
    fn test_empty_array() {
        let header = ArrayHeader::new(oid::FLOAT8, &[], 8, false).unwrap();
        assert_eq!(header.element_count(), Ok(0));
        assert_eq!(header.data_start(), 16);
        let block = encode(&header);
        assert_eq!(
            ArrayHeader::from_bytes(&block[..header.total_len()]),
            Ok(header)
        );
    }

    #[test]
    fn test_rejects_short_buffer() {
        let header = ArrayHeader::new(oid::FLOAT8, &[4], 8, false).unwrap();
        let block = encode(&header);
        assert_eq!(
            ArrayHeader::from_bytes(&block[..8]),
            Err(BridgeError::InsufficientBuffer)
        );
        assert_eq!(
            ArrayHeader::from_bytes(&block[..header.total_len() - 1]),
            Err(BridgeError::InsufficientBuffer)
        );
    }

    #[test]
    fn test_rejects_bad_ndim() {
        let header = ArrayHeader::new(oid::FLOAT8, &[1], 8, false).unwrap();
        let mut block = encode(&header);
        block[4..8].copy_from_slice(&(-1i32).to_ne_bytes());
        assert_eq!(
            ArrayHeader::from_bytes(&block[..header.total_len()]),
            Err(BridgeError::InvalidHeader)
        );
        block[4..8].copy_from_slice(&7i32.to_ne_bytes());
        assert_eq!(
            ArrayHeader::from_bytes(&block[..header.total_len()]),
            Err(BridgeError::InvalidHeader)
        );
    }

    #[test]
    fn test_rejects_missing_element_type() {
        assert_eq!(
            ArrayHeader::new(TypeOid::INVALID, &[2], 8, false),
            Err(BridgeError::InvalidHeader)
        );

        let header = ArrayHeader::new(oid::FLOAT8, &[2], 8, false).unwrap();
        let mut block = encode(&header);
        block[12..16].copy_from_slice(&0u32.to_ne_bytes());
        assert_eq!(
            ArrayHeader::from_bytes(&block[..header.total_len()]),
            Err(BridgeError::InvalidHeader)
        );
    }

    #[test]
    fn test_rejects_negative_dimension() {
        let header = ArrayHeader::new(oid::FLOAT8, &[1], 8, false).unwrap();
        let mut block = encode(&header);
        block[16..20].copy_from_slice(&(-3i32).to_ne_bytes());
        assert_eq!(
            ArrayHeader::from_bytes(&block[..header.total_len()]),
            Err(BridgeError::InvalidHeader)
        );
        assert_eq!(
            ArrayHeader::new(oid::FLOAT8, &[-1], 8, false),
            Err(BridgeError::InvalidHeader)
        );
    }

    #[test]
    fn test_rejects_overlapping_data_offset() {
        let header = ArrayHeader::new(oid::FLOAT8, &[4], 8, true).unwrap();
        let mut block = encode(&header);
        // Data may not start inside the dimension entries
        block[8..12].copy_from_slice(&16i32.to_ne_bytes());
        assert_eq!(
            ArrayHeader::from_bytes(&block[..header.total_len()]),
            Err(BridgeError::InvalidHeader)
        );
    }

    #[test]
    fn test_too_many_dimensions() {
        assert_eq!(
            ArrayHeader::new(oid::FLOAT8, &[1; 7], 8, false),
            Err(BridgeError::InvalidHeader)
        );
    }

    #[test]
    fn test_size_overflow() {
        assert_eq!(
            ArrayHeader::new(oid::FLOAT8, &[i32::MAX, i32::MAX], 8, false),
            Err(BridgeError::ArraySizeOverflow)
        );
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_to_bytes_matches_write_to() {
        let header = ArrayHeader::new(oid::FLOAT8, &[3, 2], 8, false).unwrap();
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), ArrayHeader::fixed_overhead(2));
        assert_eq!(&bytes[..], &encode(&header)[..bytes.len()]);
        assert_eq!(read_i32(&bytes, ARRAY_HEADER_SIZE + 4), 2);
    }
}
