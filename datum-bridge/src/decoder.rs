//! Default decoder for the host's native datum encoding

use std::ptr::NonNull;

use datum_bridge_core::{
    validate_alignment, ArrayDescriptor, ArrayHeader, BridgeError, Datum, HostDecoder,
    ARRAY_HEADER_SIZE,
};

/// Decoder for pass-by-value scalars and in-memory array blocks
///
/// Arrays decoded here are never reported as shared; hosts that hand out
/// copy-on-write storage should wrap this decoder and override
/// [`HostDecoder::array_descriptor`] to set the flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDecoder;

impl HostDecoder for NativeDecoder {
    unsafe fn array_descriptor(&self, datum: Datum) -> datum_bridge_core::Result<ArrayDescriptor> {
        let base = datum.as_mut_ptr::<u8>();
        if base.is_null() {
            return Err(BridgeError::NullPointer);
        }
        validate_alignment::<u64>(base)?;

        // SAFETY: caller guarantees the datum points at a live array block,
        // which always starts with the fixed header; alignment checked above
        let total_len = unsafe { base.cast::<u32>().read() } as usize;
        if total_len < ARRAY_HEADER_SIZE {
            return Err(BridgeError::InvalidHeader);
        }

        // SAFETY: the block is total_len bytes long per its own header
        let block = unsafe { std::slice::from_raw_parts(base as *const u8, total_len) };
        let header = ArrayHeader::from_bytes(block)?;

        // SAFETY: from_bytes verified data_start <= total_len
        let data = unsafe { base.add(header.data_start()) };

        Ok(ArrayDescriptor {
            header,
            data,
            data_len: header.data_len(),
            shared: false,
        })
    }

    unsafe fn row_handle(&self, datum: Datum) -> datum_bridge_core::Result<NonNull<u8>> {
        NonNull::new(datum.as_mut_ptr::<u8>()).ok_or(BridgeError::NullPointer)
    }
}
