#![no_std]

//! Datum Bridge Core - Host Value Layout Definitions
//!
//! This crate describes how a host runtime hands values across its boundary:
//! tagged datum words, the in-memory array header, the type catalog interface,
//! and the pure validation rules applied before any foreign buffer is viewed.
//! It performs no allocation unless the `alloc` feature is enabled.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod error;
pub mod format;
pub mod kinds;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use kinds::*;
pub use traits::*;
pub use validation::{
    validate_alignment, validate_data_region, validate_no_nulls, validate_single_dimension,
};
