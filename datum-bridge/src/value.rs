//! Converted values
//!
//! Every conversion produces one of a closed set of payloads, held in
//! [`AnyValue`] and shared behind the reference-counted [`AbstractValue`].
//! [`ConcreteValue`] is the typed holder used when the payload type is
//! known statically.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::Arc;

use datum_bridge_core::{BridgeError, ValueKind};

use crate::view::TypedArrayView;
use crate::Result;

/// Pointer to a host row, passed through without interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpaqueRow<'h> {
    ptr: NonNull<u8>,
    _scope: PhantomData<&'h [u8]>,
}

// SAFETY: OpaqueRow never dereferences its pointer; it is an address
// handed back to whatever row decoder the host supplies.
unsafe impl Send for OpaqueRow<'_> {}
unsafe impl Sync for OpaqueRow<'_> {}

impl OpaqueRow<'_> {
    pub fn new(ptr: NonNull<u8>) -> Self {
        Self {
            ptr,
            _scope: PhantomData,
        }
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }
}

/// Payload of a converted value
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue<'h> {
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Float64Array(TypedArrayView<'h, f64>),
    Row(OpaqueRow<'h>),
}

impl<'h> AnyValue<'h> {
    pub fn kind_of(&self) -> ValueKind {
        match self {
            AnyValue::Float64Array(_) => ValueKind::Array,
            AnyValue::Row(_) => ValueKind::Row,
            _ => ValueKind::Scalar,
        }
    }

    /// Name of the payload type
    pub fn type_name(&self) -> &'static str {
        match self {
            AnyValue::Bool(_) => <bool as Payload<'h>>::NAME,
            AnyValue::Int16(_) => <i16 as Payload<'h>>::NAME,
            AnyValue::Int32(_) => <i32 as Payload<'h>>::NAME,
            AnyValue::Int64(_) => <i64 as Payload<'h>>::NAME,
            AnyValue::Float32(_) => <f32 as Payload<'h>>::NAME,
            AnyValue::Float64(_) => <f64 as Payload<'h>>::NAME,
            AnyValue::Float64Array(_) => <TypedArrayView<'h, f64> as Payload<'h>>::NAME,
            AnyValue::Row(_) => <OpaqueRow<'h> as Payload<'h>>::NAME,
        }
    }
}

impl fmt::Display for AnyValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyValue::Bool(v) => write!(f, "{v}"),
            AnyValue::Int16(v) => write!(f, "{v}"),
            AnyValue::Int32(v) => write!(f, "{v}"),
            AnyValue::Int64(v) => write!(f, "{v}"),
            AnyValue::Float32(v) => write!(f, "{v}"),
            AnyValue::Float64(v) => write!(f, "{v}"),
            AnyValue::Float64Array(view) => write!(f, "{:?}", view.as_slice()),
            AnyValue::Row(row) => write!(f, "row@{:p}", row.as_ptr()),
        }
    }
}

/// Types that can be held in an [`AnyValue`]
pub trait Payload<'h>: Sized {
    /// Name reported in type mismatch errors
    const NAME: &'static str;

    fn into_any(self) -> AnyValue<'h>;

    fn from_any_ref<'a>(value: &'a AnyValue<'h>) -> Option<&'a Self>;

    fn from_any(value: AnyValue<'h>) -> Option<Self>;
}

macro_rules! scalar_payload {
    ($($ty:ty => $variant:ident, $name:literal;)*) => {
        $(
            impl<'h> Payload<'h> for $ty {
                const NAME: &'static str = $name;

                fn into_any(self) -> AnyValue<'h> {
                    AnyValue::$variant(self)
                }

                fn from_any_ref<'a>(value: &'a AnyValue<'h>) -> Option<&'a Self> {
                    match value {
                        AnyValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn from_any(value: AnyValue<'h>) -> Option<Self> {
                    match value {
                        AnyValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

scalar_payload! {
    bool => Bool, "bool";
    i16 => Int16, "i16";
    i32 => Int32, "i32";
    i64 => Int64, "i64";
    f32 => Float32, "f32";
    f64 => Float64, "f64";
}

impl<'h> Payload<'h> for TypedArrayView<'h, f64> {
    const NAME: &'static str = "f64[]";

    fn into_any(self) -> AnyValue<'h> {
        AnyValue::Float64Array(self)
    }

    fn from_any_ref<'a>(value: &'a AnyValue<'h>) -> Option<&'a Self> {
        match value {
            AnyValue::Float64Array(view) => Some(view),
            _ => None,
        }
    }

    fn from_any(value: AnyValue<'h>) -> Option<Self> {
        match value {
            AnyValue::Float64Array(view) => Some(view),
            _ => None,
        }
    }
}

impl<'h> Payload<'h> for OpaqueRow<'h> {
    const NAME: &'static str = "row";

    fn into_any(self) -> AnyValue<'h> {
        AnyValue::Row(self)
    }

    fn from_any_ref<'a>(value: &'a AnyValue<'h>) -> Option<&'a Self> {
        match value {
            AnyValue::Row(row) => Some(row),
            _ => None,
        }
    }

    fn from_any(value: AnyValue<'h>) -> Option<Self> {
        match value {
            AnyValue::Row(row) => Some(row),
            _ => None,
        }
    }
}

/// A payload of statically known type
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteValue<T> {
    payload: T,
}

impl<T> ConcreteValue<T> {
    pub fn new(payload: T) -> Self {
        Self { payload }
    }

    pub fn get(&self) -> &T {
        &self.payload
    }

    pub fn into_inner(self) -> T {
        self.payload
    }
}

/// Shared handle to a converted value
///
/// Cloning shares the payload. For array payloads this also shares the
/// storage handle, so writes through a view taken with [`try_as`] fail with
/// `SharedView` while the abstract value is alive; use [`into_inner`] to
/// take the view over.
///
/// [`try_as`]: AbstractValue::try_as
/// [`into_inner`]: AbstractValue::into_inner
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractValue<'h>(Arc<AnyValue<'h>>);

impl<'h> AbstractValue<'h> {
    pub fn new(value: AnyValue<'h>) -> Self {
        Self(Arc::new(value))
    }

    /// Shape of the held payload
    pub fn kind_of(&self) -> ValueKind {
        self.0.kind_of()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn payload(&self) -> &AnyValue<'h> {
        &self.0
    }

    /// Borrow the payload as `T`
    pub fn try_as_ref<T: Payload<'h>>(&self) -> Result<&T> {
        T::from_any_ref(&self.0).ok_or_else(|| self.mismatch::<T>())
    }

    /// Copy of the payload as `T`
    pub fn try_as<T: Payload<'h> + Clone>(&self) -> Result<T> {
        self.try_as_ref::<T>().cloned()
    }

    /// Typed holder for a copy of the payload
    pub fn concrete<T: Payload<'h> + Clone>(&self) -> Result<ConcreteValue<T>> {
        self.try_as::<T>().map(ConcreteValue::new)
    }

    /// Take the payload as `T`
    ///
    /// Moves the payload out when this is the last reference, otherwise
    /// copies it.
    pub fn into_inner<T: Payload<'h> + Clone>(self) -> Result<T> {
        let mismatch = self.mismatch::<T>();
        match Arc::try_unwrap(self.0) {
            Ok(value) => T::from_any(value).ok_or(mismatch),
            Err(shared) => T::from_any_ref(&shared).cloned().ok_or(mismatch),
        }
    }

    /// Number of holders sharing this value
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    fn mismatch<T: Payload<'h>>(&self) -> crate::Error {
        BridgeError::TypeMismatch {
            expected: T::NAME,
            found: self.type_name(),
        }
        .into()
    }
}

impl<'h, T: Payload<'h>> From<ConcreteValue<T>> for AbstractValue<'h> {
    fn from(value: ConcreteValue<T>) -> Self {
        Self::new(value.into_inner().into_any())
    }
}

impl<'h> From<AnyValue<'h>> for AbstractValue<'h> {
    fn from(value: AnyValue<'h>) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for AbstractValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), self.0)
    }
}
