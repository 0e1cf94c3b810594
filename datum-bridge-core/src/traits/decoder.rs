//! Host value decoding interface

use core::ptr::NonNull;

use crate::error::Result;
use crate::format::{ArrayDescriptor, Datum};

/// Functions that turn a datum into native values
///
/// Scalar decoders are total: any word decodes to some value of the target
/// type. Array and row decoders dereference the datum and are therefore
/// `unsafe`.
pub trait HostDecoder {
    fn as_bool(&self, datum: Datum) -> bool {
        datum.as_bool()
    }

    fn as_int16(&self, datum: Datum) -> i16 {
        datum.as_i16()
    }

    fn as_int32(&self, datum: Datum) -> i32 {
        datum.as_i32()
    }

    fn as_int64(&self, datum: Datum) -> i64 {
        datum.as_i64()
    }

    fn as_float32(&self, datum: Datum) -> f32 {
        datum.as_f32()
    }

    fn as_float64(&self, datum: Datum) -> f64 {
        datum.as_f64()
    }

    /// Decode an array datum into its native description
    ///
    /// # Safety
    ///
    /// `datum` must be an array datum produced by the host, pointing at an
    /// array block that stays valid and unmoved for as long as the returned
    /// descriptor (or anything built from it) is used.
    unsafe fn array_descriptor(&self, datum: Datum) -> Result<ArrayDescriptor>;

    /// Decode a row datum into an opaque tuple pointer
    ///
    /// # Safety
    ///
    /// `datum` must be a row datum produced by the host. The returned
    /// pointer is never dereferenced by the bridge but inherits the same
    /// validity scope as the datum.
    unsafe fn row_handle(&self, datum: Datum) -> Result<NonNull<u8>>;
}
