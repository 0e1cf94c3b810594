//! Datum Bridge - Zero-copy conversion of host datums into typed values
//!
//! A host runtime hands values across its boundary as a fixed-width datum
//! word plus a type identifier. This library classifies the type through the
//! host's catalog, decodes the word, and returns a shared, typed value.
//! Float8 arrays become views over the host's own storage; no element is
//! copied.
//!
//! ## Architecture
//!
//! - **datum-bridge-core**: Layout definitions, catalog and decoder traits, and validation (no allocation)
//! - **datum-bridge**: The conversion pipeline, shared values, views and an in-memory catalog
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use datum_bridge::{oid, HostArrayBuffer, StaticCatalog, TypedArrayView, ValueBridge};
//!
//! fn example() -> datum_bridge::Result<()> {
//!     let bridge = ValueBridge::new(StaticCatalog::builtin());
//!     let mut buffer = HostArrayBuffer::from_f64(&[1.5, 2.5, 3.5])?;
//!
//!     // SAFETY: the buffer outlives the value and is not touched meanwhile
//!     let value = unsafe { bridge.to_value(oid::FLOAT8_ARRAY, buffer.datum(), false)? };
//!     if let Some(value) = value {
//!         let view: TypedArrayView<'_, f64> = value.into_inner()?;
//!         println!("second element = {}", view.get(1)?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Outcomes
//!
//! - `Ok(Some(value))`: the datum was decoded
//! - `Ok(None)`: no decode strategy exists for the type, so callers may fall back
//! - `Err(_)`: the value has an unsupported shape or malformed encoding

pub use datum_bridge_core::{
    // Catalog and decoding
    classify, HostDecoder, TypeCatalog, TypeKind,
    // Kinds and encodings
    oid, ArrayElement, ArrayDescriptor, ArrayHeader, Datum, ElementKind, ScalarKind, TypeOid,
    ValueKind,
    // Error handling
    BridgeError, ErrorCategory,
};

pub mod bridge;
pub mod catalog;
pub mod config;
pub mod decoder;
pub mod error;
pub mod host;
pub mod memory;
pub mod value;
pub mod view;

pub use bridge::{DecodeStrategy, ValueBridge};
pub use catalog::{StaticCatalog, TypeEntry};
pub use config::BridgeConfig;
pub use decoder::NativeDecoder;
pub use error::{Error, Result};
pub use host::HostArrayBuffer;
pub use memory::ArrayMemoryHandle;
pub use value::{AbstractValue, AnyValue, ConcreteValue, OpaqueRow, Payload};
pub use view::{Mutability, TypedArrayView};
