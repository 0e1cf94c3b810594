//! Array bounds and alignment validation
//!
//! Pure arithmetic checks with overflow protection. Nothing here reads
//! through the pointers it is given.

use crate::BridgeError;

/// Check that `ptr` is aligned for `T`
pub fn validate_alignment<T>(ptr: *const u8) -> Result<(), BridgeError> {
    let alignment = core::mem::align_of::<T>();
    let addr = ptr as usize;

    if addr % alignment != 0 {
        return Err(BridgeError::ArrayAlignment);
    }

    Ok(())
}

/// Validate that `count` elements of `elem_size` bytes fit in `available`
pub const fn validate_data_region(
    count: usize,
    elem_size: usize,
    available: usize,
) -> Result<(), BridgeError> {
    let needed = match count.checked_mul(elem_size) {
        Some(bytes) => bytes,
        None => return Err(BridgeError::ArraySizeOverflow),
    };

    if needed > available {
        return Err(BridgeError::InsufficientBuffer);
    }

    Ok(())
}
