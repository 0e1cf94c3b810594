//! Error types for datum conversion

use crate::kinds::TypeOid;

/// Errors that can occur while interpreting host values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    /// Array does not have exactly one dimension
    UnsupportedShape { ndim: i32 },
    /// Array carries a null bitmap
    UnsupportedNullability,
    /// View index outside `0..len`
    OutOfRange { index: usize, len: usize },
    /// Payload requested as a type it does not hold
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Write attempted through a read-only view
    ReadOnlyView,
    /// Write attempted while other views share the storage
    SharedView,
    /// Catalog element type disagrees with the array's element tag
    ElementTypeMismatch { declared: TypeOid, actual: TypeOid },
    /// Datum word does not point anywhere
    NullPointer,
    /// Malformed array header
    InvalidHeader,
    /// Buffer shorter than the layout requires
    InsufficientBuffer,
    /// Buffer not aligned for its element type
    ArrayAlignment,
    /// Element count would overflow size calculations
    ArraySizeOverflow,
}

/// Broad grouping of [`BridgeError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The value has a shape this bridge does not handle
    Shape,
    /// Misuse of a constructed value or view
    Access,
    /// The foreign buffer cannot be safely viewed
    Memory,
    /// The host encoding is malformed
    Format,
}

impl BridgeError {
    /// Get the category of this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::UnsupportedShape { .. } | BridgeError::UnsupportedNullability => {
                ErrorCategory::Shape
            }
            BridgeError::OutOfRange { .. }
            | BridgeError::TypeMismatch { .. }
            | BridgeError::ReadOnlyView
            | BridgeError::SharedView => ErrorCategory::Access,
            BridgeError::NullPointer
            | BridgeError::ArrayAlignment
            | BridgeError::ArraySizeOverflow => ErrorCategory::Memory,
            BridgeError::ElementTypeMismatch { .. }
            | BridgeError::InvalidHeader
            | BridgeError::InsufficientBuffer => ErrorCategory::Format,
        }
    }
}

impl core::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BridgeError::UnsupportedShape { ndim } => {
                write!(f, "Unsupported array shape: {ndim} dimensions (expected 1)")
            }
            BridgeError::UnsupportedNullability => {
                write!(f, "Arrays with null elements are not supported")
            }
            BridgeError::OutOfRange { index, len } => {
                write!(f, "Index {index} out of range for length {len}")
            }
            BridgeError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: requested {expected}, value holds {found}")
            }
            BridgeError::ReadOnlyView => write!(f, "Write through read-only view"),
            BridgeError::SharedView => write!(f, "Write through view with shared storage"),
            BridgeError::ElementTypeMismatch { declared, actual } => write!(
                f,
                "Element type mismatch: declared {declared}, array holds {actual}"
            ),
            BridgeError::NullPointer => write!(f, "Datum is a null pointer"),
            BridgeError::InvalidHeader => write!(f, "Invalid array header"),
            BridgeError::InsufficientBuffer => write!(f, "Insufficient buffer space"),
            BridgeError::ArrayAlignment => write!(f, "Array data is misaligned"),
            BridgeError::ArraySizeOverflow => write!(f, "Array size overflow"),
        }
    }
}

impl core::error::Error for BridgeError {}

/// Result type for datum conversion
pub type Result<T> = core::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_categories() {
        assert_eq!(
            BridgeError::UnsupportedShape { ndim: 2 }.category(),
            ErrorCategory::Shape
        );
        assert_eq!(BridgeError::ReadOnlyView.category(), ErrorCategory::Access);
        assert_eq!(BridgeError::NullPointer.category(), ErrorCategory::Memory);
        assert_eq!(BridgeError::InvalidHeader.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BridgeError::OutOfRange { index: 3, len: 3 }.to_string(),
            "Index 3 out of range for length 3"
        );
        assert_eq!(
            BridgeError::ElementTypeMismatch {
                declared: TypeOid(701),
                actual: TypeOid(25)
            }
            .to_string(),
            "Element type mismatch: declared oid 701, array holds oid 25"
        );
    }
}
