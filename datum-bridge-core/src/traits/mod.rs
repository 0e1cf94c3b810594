//! Abstract interfaces to the host runtime
//!
//! The catalog and decoder traits are what the bridge consumes from its
//! external collaborators. Traits are pure interfaces here; the bridge crate
//! supplies the default implementations.

pub mod catalog;
pub mod decoder;
pub mod element;

pub use catalog::{classify, TypeCatalog, TypeKind};
pub use decoder::HostDecoder;
pub use element::ArrayElement;
