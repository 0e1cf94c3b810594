//! Validation utilities applied before foreign memory is viewed
//!
//! This module contains pure validation functions with no memory access.
//! All functions are checks on layout arithmetic and declared shape.

pub mod bounds;
pub mod format;
pub mod shape;

pub use bounds::{validate_alignment, validate_data_region};
pub use format::align_to_boundary;
pub use shape::{validate_no_nulls, validate_single_dimension};
