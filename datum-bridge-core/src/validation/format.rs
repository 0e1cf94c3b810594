//! Layout arithmetic for the host array format

use crate::format::DATA_ALIGNMENT;
use crate::BridgeError;

/// Align an offset to a specific boundary
///
/// `boundary` must be a power of two.
pub const fn align_to_boundary(offset: usize, boundary: usize) -> usize {
    (offset + boundary - 1) & !(boundary - 1)
}

/// Align an offset to the 8-byte data boundary
pub const fn align_to_8(offset: usize) -> usize {
    align_to_boundary(offset, DATA_ALIGNMENT)
}

/// Validate that an offset is properly aligned
pub const fn validate_offset_alignment(offset: usize, boundary: usize) -> Result<(), BridgeError> {
    if offset % boundary != 0 {
        return Err(BridgeError::ArrayAlignment);
    }
    Ok(())
}
