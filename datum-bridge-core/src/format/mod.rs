//! Host value encodings
//!
//! Pure layout definitions: the datum word, the array header and the
//! descriptor handed to the bridge. Nothing here dereferences memory.

pub mod constants;
pub mod datum;
pub mod descriptor;
pub mod header;

pub use constants::{
    oid, ARRAY_HEADER_SIZE, DATA_ALIGNMENT, DIMENSION_ENTRY_SIZE, MAX_DIMENSIONS,
};
pub use datum::Datum;
pub use descriptor::ArrayDescriptor;
pub use header::ArrayHeader;
