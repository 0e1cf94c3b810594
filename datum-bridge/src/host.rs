//! Host-style array storage built outside the host
//!
//! [`HostArrayBuffer`] lays out an array block exactly as the host would,
//! in an 8-byte aligned allocation, so datums can be produced for tools,
//! benches and tests without a running host.

use datum_bridge_core::{oid, ArrayElement, ArrayHeader, BridgeError, Datum, TypeOid};

use crate::Result;

/// Owned array block in the host's native layout
#[derive(Debug, Clone)]
pub struct HostArrayBuffer {
    words: Vec<u64>,
    header: ArrayHeader,
}

impl HostArrayBuffer {
    /// One-dimensional float8 array
    pub fn from_f64(values: &[f64]) -> Result<Self> {
        let len = i32::try_from(values.len()).map_err(|_| BridgeError::ArraySizeOverflow)?;
        Self::from_elements(values, &[len], false)
    }

    /// Typed array with explicit dimensions, optionally carrying a null bitmap
    ///
    /// When a bitmap is requested every element is marked present.
    pub fn from_elements<T: ArrayElement>(
        values: &[T],
        dims: &[i32],
        with_null_bitmap: bool,
    ) -> Result<Self> {
        Self::build(
            T::type_oid(),
            dims,
            T::size_bytes(),
            bytemuck::cast_slice(values),
            with_null_bitmap,
        )
    }

    /// Lay out an arbitrary fixed-width element payload
    ///
    /// `payload` must hold exactly `elem_size` bytes per element implied by
    /// `dims`. The element type is recorded as given, which allows building
    /// arrays of types the bridge does not view.
    pub fn build(
        elem_type: TypeOid,
        dims: &[i32],
        elem_size: usize,
        payload: &[u8],
        with_null_bitmap: bool,
    ) -> Result<Self> {
        let header = ArrayHeader::new(elem_type, dims, elem_size, with_null_bitmap)?;
        let count = header.element_count()?;
        if payload.len() != count * elem_size {
            return Err(BridgeError::InsufficientBuffer.into());
        }

        let mut words = vec![0u64; header.total_len().div_ceil(8)];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        let written = header.write_to(bytes)?;

        if with_null_bitmap {
            let bitmap_len = ArrayHeader::null_bitmap_len(count);
            bytes[written..written + bitmap_len].fill(0xFF);
        }

        let start = header.data_start();
        bytes[start..start + payload.len()].copy_from_slice(payload);

        Ok(Self { words, header })
    }

    /// Datum pointing at this block
    ///
    /// The datum stays valid until the buffer is dropped or moved out of
    /// its allocation; writes through views built from it land here.
    pub fn datum(&mut self) -> Datum {
        Datum::from_ptr(self.words.as_mut_ptr())
    }

    /// Header the block was laid out with
    pub fn header(&self) -> &ArrayHeader {
        &self.header
    }

    /// Total size of the block in bytes
    pub fn byte_len(&self) -> usize {
        self.header.total_len()
    }

    /// Current contents of a float8 block
    pub fn values_f64(&self) -> Result<&[f64]> {
        if self.header.elem_type() != oid::FLOAT8 {
            return Err(BridgeError::ElementTypeMismatch {
                declared: oid::FLOAT8,
                actual: self.header.elem_type(),
            }
            .into());
        }

        let bytes: &[u8] = bytemuck::cast_slice(&self.words);
        let start = self.header.data_start();
        let len = self.header.element_count()? * 8;
        bytemuck::try_cast_slice(&bytes[start..start + len])
            .map_err(|_| BridgeError::ArrayAlignment.into())
    }
}
