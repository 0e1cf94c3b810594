//! Shape checks for arrays the bridge is willing to view

use crate::format::ArrayHeader;
use crate::BridgeError;

/// Require exactly one dimension and return its length
pub fn validate_single_dimension(header: &ArrayHeader) -> Result<usize, BridgeError> {
    match header.dims() {
        [len] => Ok(*len as usize),
        _ => Err(BridgeError::UnsupportedShape {
            ndim: header.ndim(),
        }),
    }
}

/// Require the absence of a null bitmap
pub const fn validate_no_nulls(header: &ArrayHeader) -> Result<(), BridgeError> {
    if header.has_nulls() {
        return Err(BridgeError::UnsupportedNullability);
    }
    Ok(())
}
