//! Classify-then-decode conversion of host datums

use log::{debug, trace, warn};

use datum_bridge_core::{
    classify, validate_data_region, validate_no_nulls, validate_single_dimension, BridgeError,
    Datum, ElementKind, HostDecoder, ScalarKind, TypeCatalog, TypeKind, TypeOid,
};

use crate::config::BridgeConfig;
use crate::decoder::NativeDecoder;
use crate::memory::ArrayMemoryHandle;
use crate::value::{AbstractValue, ConcreteValue, OpaqueRow};
use crate::view::TypedArrayView;
use crate::{Error, Result};

/// How a classified type is turned into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStrategy {
    Row,
    Array(ElementKind),
    Scalar(ScalarKind),
}

impl DecodeStrategy {
    /// Strategy for a classified type, or `None` when none is registered
    pub const fn for_kind(kind: TypeKind) -> Option<Self> {
        match kind {
            TypeKind::Row => Some(DecodeStrategy::Row),
            TypeKind::Array(element) => match ElementKind::from_oid(element) {
                Some(element) => Some(DecodeStrategy::Array(element)),
                None => None,
            },
            TypeKind::Scalar(type_id) => match ScalarKind::from_oid(type_id) {
                Some(scalar) => Some(DecodeStrategy::Scalar(scalar)),
                None => None,
            },
        }
    }
}

/// Converts `(type id, datum)` pairs into [`AbstractValue`]s
#[derive(Debug, Clone)]
pub struct ValueBridge<C, D = NativeDecoder> {
    catalog: C,
    decoder: D,
    config: BridgeConfig,
}

impl<C: TypeCatalog> ValueBridge<C> {
    /// Bridge over `catalog` using the native datum encoding
    pub fn new(catalog: C) -> Self {
        Self::with_decoder(catalog, NativeDecoder)
    }
}

impl<C: TypeCatalog, D: HostDecoder> ValueBridge<C, D> {
    pub fn with_decoder(catalog: C, decoder: D) -> Self {
        Self {
            catalog,
            decoder,
            config: BridgeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn classify(&self, type_id: TypeOid) -> TypeKind {
        classify(&self.catalog, type_id)
    }

    /// Strategy that [`to_value`](Self::to_value) would use for `type_id`
    pub fn strategy_for(&self, type_id: TypeOid) -> Option<DecodeStrategy> {
        DecodeStrategy::for_kind(self.classify(type_id))
    }

    /// Convert a datum of type `type_id`
    ///
    /// Returns `Ok(None)` when no decode strategy exists for the type (or,
    /// for arrays, its element type), unless the configuration asks for
    /// [`Error::Unmapped`] instead. Array views are writable only when
    /// `writable` is requested, the configuration allows it, and the decoder
    /// does not report the storage as shared.
    ///
    /// # Safety
    ///
    /// Row and array datums must point at live host storage of the layout
    /// `type_id` describes. That storage must stay allocated and unmoved for
    /// all of `'h`, and the host must not write to it while any value or
    /// view produced here is alive. Nothing produced here frees the storage.
    ///
    /// An array datum must not be converted again while a slice borrowed
    /// from one of its views' [`TypedArrayView::as_mut_slice`] is alive.
    /// Converting it several times is otherwise fine: each conversion wraps
    /// the storage anew, and views over twice-wrapped storage refuse writes
    /// with `SharedView` until only one wrap is left.
    pub unsafe fn to_value<'h>(
        &self,
        type_id: TypeOid,
        datum: Datum,
        writable: bool,
    ) -> Result<Option<AbstractValue<'h>>> {
        let kind = self.classify(type_id);
        trace!("Converting {type_id} classified as {kind:?}");

        let value = match kind {
            TypeKind::Row => {
                // SAFETY: forwarded from the caller
                let ptr = unsafe { self.decoder.row_handle(datum) }?;
                Some(ConcreteValue::new(OpaqueRow::new(ptr)).into())
            }
            TypeKind::Array(element) => {
                // SAFETY: forwarded from the caller
                (unsafe { self.array_value(element, datum, writable) })?
            }
            TypeKind::Scalar(type_id) => {
                ScalarKind::from_oid(type_id).map(|scalar| self.scalar_value(scalar, datum))
            }
        };

        match value {
            Some(value) => Ok(Some(value)),
            None => self.unmapped(type_id),
        }
    }

    fn scalar_value<'h>(&self, scalar: ScalarKind, datum: Datum) -> AbstractValue<'h> {
        let decoder = &self.decoder;
        match scalar {
            ScalarKind::Bool => ConcreteValue::new(decoder.as_bool(datum)).into(),
            ScalarKind::Int16 => ConcreteValue::new(decoder.as_int16(datum)).into(),
            ScalarKind::Int32 => ConcreteValue::new(decoder.as_int32(datum)).into(),
            ScalarKind::Int64 => ConcreteValue::new(decoder.as_int64(datum)).into(),
            ScalarKind::Float32 => ConcreteValue::new(decoder.as_float32(datum)).into(),
            ScalarKind::Float64 => ConcreteValue::new(decoder.as_float64(datum)).into(),
        }
    }

    /// # Safety
    ///
    /// Same contract as [`to_value`](Self::to_value).
    unsafe fn array_value<'h>(
        &self,
        element: TypeOid,
        datum: Datum,
        writable: bool,
    ) -> Result<Option<AbstractValue<'h>>> {
        // SAFETY: forwarded from the caller
        let descriptor = unsafe { self.decoder.array_descriptor(datum) }?;
        let len = validate_single_dimension(&descriptor.header)?;
        validate_no_nulls(&descriptor.header)?;

        if self.config.check_element_type && descriptor.elem_type() != element {
            warn!(
                "Catalog element type {element} disagrees with array element tag {}",
                descriptor.elem_type()
            );
            return Err(BridgeError::ElementTypeMismatch {
                declared: element,
                actual: descriptor.elem_type(),
            }
            .into());
        }

        let Some(kind) = ElementKind::from_oid(element) else {
            return Ok(None);
        };

        if len > self.config.max_array_len {
            return Err(BridgeError::ArraySizeOverflow.into());
        }
        validate_data_region(len, kind.size_bytes(), descriptor.data_len)?;

        let mutable = writable && self.config.allow_writable_arrays && !descriptor.shared;
        if writable && !mutable {
            debug!(
                "Writable view of {len} {element} elements downgraded to read-only (shared: {})",
                descriptor.shared
            );
        }

        // SAFETY: the descriptor's data region holds len elements of kind,
        // checked above; lifetime and aliasing are forwarded from the caller
        let handle = unsafe { ArrayMemoryHandle::wrap(descriptor.data, len, kind) }?;
        let value = match kind {
            ElementKind::Float64 => {
                ConcreteValue::new(TypedArrayView::<f64>::new(handle, len, mutable)?).into()
            }
        };
        Ok(Some(value))
    }

    fn unmapped<T>(&self, type_id: TypeOid) -> Result<Option<T>> {
        if self.config.strict_unmapped {
            return Err(Error::Unmapped(type_id));
        }
        debug!("No decode strategy for {type_id}");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::host::HostArrayBuffer;
    use datum_bridge_core::{oid, ArrayDescriptor, ValueKind};
    use rand::Rng;
    use std::ptr::NonNull;

    fn bridge() -> ValueBridge<StaticCatalog> {
        ValueBridge::new(StaticCatalog::builtin())
    }

    fn convert<'h>(
        bridge: &ValueBridge<StaticCatalog, impl HostDecoder>,
        type_id: TypeOid,
        datum: Datum,
        writable: bool,
    ) -> Result<Option<AbstractValue<'h>>> {
        unsafe { bridge.to_value(type_id, datum, writable) }
    }

    #[test]
    fn test_bool_true() {
        let value = convert(&bridge(), oid::BOOL, Datum::from_bool(true), false)
            .unwrap()
            .unwrap();
        assert_eq!(value.kind_of(), ValueKind::Scalar);
        assert_eq!(value.concrete::<bool>().unwrap(), ConcreteValue::new(true));
    }

    #[test]
    fn test_scalar_round_trips() {
        let bridge = bridge();
        let get = |type_id, datum| convert(&bridge, type_id, datum, false).unwrap().unwrap();

        assert!(!get(oid::BOOL, Datum::from_bool(false)).try_as::<bool>().unwrap());
        assert_eq!(
            get(oid::INT2, Datum::from_i16(i16::MIN)).try_as::<i16>().unwrap(),
            i16::MIN
        );
        assert_eq!(
            get(oid::INT4, Datum::from_i32(-123_456)).try_as::<i32>().unwrap(),
            -123_456
        );
        assert_eq!(
            get(oid::INT8, Datum::from_i64(i64::MAX)).try_as::<i64>().unwrap(),
            i64::MAX
        );
        assert_eq!(
            get(oid::FLOAT4, Datum::from_f32(-0.75)).try_as::<f32>().unwrap(),
            -0.75
        );
        assert_eq!(
            get(oid::FLOAT8, Datum::from_f64(1e300)).try_as::<f64>().unwrap(),
            1e300
        );
    }

    #[test]
    fn test_randomized_scalars() {
        let bridge = bridge();
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let a: i64 = rng.gen();
            let b: f64 = rng.gen_range(-1e9..1e9);
            let c: i16 = rng.gen();

            let value = convert(&bridge, oid::INT8, Datum::from_i64(a), false)
                .unwrap()
                .unwrap();
            assert_eq!(value.try_as::<i64>().unwrap(), a);

            let value = convert(&bridge, oid::FLOAT8, Datum::from_f64(b), false)
                .unwrap()
                .unwrap();
            assert_eq!(value.try_as::<f64>().unwrap().to_bits(), b.to_bits());

            let value = convert(&bridge, oid::INT2, Datum::from_i16(c), false)
                .unwrap()
                .unwrap();
            assert_eq!(value.try_as::<i16>().unwrap(), c);
        }
    }

    #[test]
    fn test_read_only_float8_array() {
        let mut buffer = HostArrayBuffer::from_f64(&[1.5, 2.5, 3.5]).unwrap();
        let value = convert(&bridge(), oid::FLOAT8_ARRAY, buffer.datum(), false)
            .unwrap()
            .unwrap();
        assert_eq!(value.kind_of(), ValueKind::Array);

        let mut view: TypedArrayView<'_, f64> = value.into_inner().unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.get(1).unwrap(), 2.5);
        assert_eq!(
            view.set(1, 0.0).unwrap_err().as_bridge(),
            Some(BridgeError::ReadOnlyView)
        );
    }

    #[test]
    fn test_writable_array_is_zero_copy() {
        let mut buffer = HostArrayBuffer::from_f64(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let value = convert(&bridge(), oid::FLOAT8_ARRAY, buffer.datum(), true)
            .unwrap()
            .unwrap();

        let mut view: TypedArrayView<'_, f64> = value.into_inner().unwrap();
        assert!(view.is_writable());
        view.set(0, 10.0).unwrap();
        view.set(3, -4.0).unwrap();
        drop(view);

        assert_eq!(buffer.values_f64().unwrap(), &[10.0, 2.0, 3.0, -4.0]);
    }

    #[test]
    fn test_converting_twice_blocks_writes() {
        let mut buffer = HostArrayBuffer::from_f64(&[1.0, 2.0]).unwrap();
        let bridge = bridge();
        let first = convert(&bridge, oid::FLOAT8_ARRAY, buffer.datum(), true)
            .unwrap()
            .unwrap();
        let second = convert(&bridge, oid::FLOAT8_ARRAY, buffer.datum(), true)
            .unwrap()
            .unwrap();

        let mut a: TypedArrayView<'_, f64> = first.into_inner().unwrap();
        let mut b: TypedArrayView<'_, f64> = second.into_inner().unwrap();
        assert!(a.is_writable() && b.is_writable());
        assert_eq!(a.handle().wrap_count(), 2);
        assert_eq!(
            a.as_mut_slice().unwrap_err().as_bridge(),
            Some(BridgeError::SharedView)
        );
        assert_eq!(
            b.as_mut_slice().unwrap_err().as_bridge(),
            Some(BridgeError::SharedView)
        );

        drop(a);
        b.as_mut_slice().unwrap()[0] = 99.0;
        drop(b);
        assert_eq!(buffer.values_f64().unwrap(), &[99.0, 2.0]);
    }

    #[test]
    fn test_randomized_array_reads() {
        let mut rng = rand::thread_rng();
        let bridge = bridge();
        for _ in 0..20 {
            let len = rng.gen_range(1..64);
            let source: Vec<f64> = (0..len).map(|_| rng.gen()).collect();
            let mut buffer = HostArrayBuffer::from_f64(&source).unwrap();

            let value = convert(&bridge, oid::FLOAT8_ARRAY, buffer.datum(), false)
                .unwrap()
                .unwrap();
            let view = value.try_as_ref::<TypedArrayView<'_, f64>>().unwrap();
            assert_eq!(view.len(), len);
            for (i, expected) in source.iter().enumerate() {
                assert_eq!(view.get(i).unwrap(), *expected);
            }
            assert!(view.get(len).is_err());
        }
    }

    #[test]
    fn test_view_bounds() {
        let mut buffer = HostArrayBuffer::from_f64(&[0.0; 5]).unwrap();
        let value = convert(&bridge(), oid::FLOAT8_ARRAY, buffer.datum(), false)
            .unwrap()
            .unwrap();
        let view = value.try_as_ref::<TypedArrayView<'_, f64>>().unwrap();
        assert!(view.get(4).is_ok());
        assert_eq!(
            view.get(5).unwrap_err().as_bridge(),
            Some(BridgeError::OutOfRange { index: 5, len: 5 })
        );
    }

    #[test]
    fn test_two_dimensional_array() {
        let mut buffer = HostArrayBuffer::from_elements(&[0.0f64; 6], &[2, 3], false).unwrap();
        let err = convert(&bridge(), oid::FLOAT8_ARRAY, buffer.datum(), false).unwrap_err();
        assert_eq!(err.as_bridge(), Some(BridgeError::UnsupportedShape { ndim: 2 }));
    }

    #[test]
    fn test_empty_array_has_no_dimensions() {
        let mut buffer = HostArrayBuffer::from_elements::<f64>(&[], &[], false).unwrap();
        let err = convert(&bridge(), oid::FLOAT8_ARRAY, buffer.datum(), false).unwrap_err();
        assert_eq!(err.as_bridge(), Some(BridgeError::UnsupportedShape { ndim: 0 }));
    }

    #[test]
    fn test_array_with_nulls() {
        let mut buffer = HostArrayBuffer::from_elements(&[1.0f64, 2.0], &[2], true).unwrap();
        let err = convert(&bridge(), oid::FLOAT8_ARRAY, buffer.datum(), false).unwrap_err();
        assert_eq!(err.as_bridge(), Some(BridgeError::UnsupportedNullability));
    }

    #[test]
    fn test_shape_checked_before_element_type() {
        let mut buffer = HostArrayBuffer::build(oid::TEXT, &[2, 2], 8, &[0u8; 32], false).unwrap();
        let err = convert(&bridge(), oid::TEXT_ARRAY, buffer.datum(), false).unwrap_err();
        assert_eq!(err.as_bridge(), Some(BridgeError::UnsupportedShape { ndim: 2 }));
    }

    #[test]
    fn test_unmapped_element_types() {
        let bridge = bridge();

        let mut text = HostArrayBuffer::build(oid::TEXT, &[2], 8, &[0u8; 16], false).unwrap();
        assert!(convert(&bridge, oid::TEXT_ARRAY, text.datum(), false)
            .unwrap()
            .is_none());

        let mut ints = HostArrayBuffer::build(oid::INT4, &[3], 4, &[0u8; 12], false).unwrap();
        assert!(convert(&bridge, oid::INT4_ARRAY, ints.datum(), true)
            .unwrap()
            .is_none());

        assert_eq!(bridge.strategy_for(oid::TEXT_ARRAY), None);
        assert_eq!(
            bridge.strategy_for(oid::FLOAT8_ARRAY),
            Some(DecodeStrategy::Array(ElementKind::Float64))
        );
    }

    #[test]
    fn test_unmapped_scalars() {
        let bridge = bridge();
        assert!(convert(&bridge, oid::TEXT, Datum::from_word(0xdead), false)
            .unwrap()
            .is_none());
        assert!(convert(&bridge, TypeOid(424_242), Datum::NULL, false)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_strict_unmapped() {
        let bridge = bridge().with_config(BridgeConfig::default().with_strict_unmapped(true));
        let err = convert(&bridge, oid::TEXT, Datum::NULL, false).unwrap_err();
        assert!(matches!(err, Error::Unmapped(type_id) if type_id == oid::TEXT));
    }

    #[test]
    fn test_row_passthrough() {
        let mut tuple = [0u64; 4];
        let datum = Datum::from_ptr(tuple.as_mut_ptr());
        let value = convert(&bridge(), oid::RECORD, datum, false)
            .unwrap()
            .unwrap();
        assert_eq!(value.kind_of(), ValueKind::Row);
        let row: OpaqueRow<'_> = value.try_as().unwrap();
        assert_eq!(row.as_ptr(), tuple.as_mut_ptr().cast::<u8>());

        let err = convert(&bridge(), oid::RECORD, Datum::NULL, false).unwrap_err();
        assert_eq!(err.as_bridge(), Some(BridgeError::NullPointer));
    }

    #[test]
    fn test_element_type_mismatch() {
        let mut catalog = StaticCatalog::builtin();
        catalog.register_array(TypeOid(90_000), oid::FLOAT8);
        let bridge = ValueBridge::new(catalog);

        let mut ints = HostArrayBuffer::build(oid::INT8, &[2], 8, &[0u8; 16], false).unwrap();
        let err = convert(&bridge, TypeOid(90_000), ints.datum(), false).unwrap_err();
        assert_eq!(
            err.as_bridge(),
            Some(BridgeError::ElementTypeMismatch {
                declared: oid::FLOAT8,
                actual: oid::INT8
            })
        );

        let lenient = bridge.with_config(BridgeConfig::default().with_element_type_check(false));
        assert!(convert(&lenient, TypeOid(90_000), ints.datum(), false)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_config_disables_writes() {
        let mut buffer = HostArrayBuffer::from_f64(&[1.0]).unwrap();
        let bridge = bridge().with_config(BridgeConfig::read_only());
        let value = convert(&bridge, oid::FLOAT8_ARRAY, buffer.datum(), true)
            .unwrap()
            .unwrap();
        let view: TypedArrayView<'_, f64> = value.into_inner().unwrap();
        assert!(!view.is_writable());
    }

    #[test]
    fn test_max_array_len() {
        let mut buffer = HostArrayBuffer::from_f64(&[0.0; 8]).unwrap();
        let bridge = bridge().with_config(BridgeConfig::default().with_max_array_len(4));
        let err = convert(&bridge, oid::FLOAT8_ARRAY, buffer.datum(), false).unwrap_err();
        assert_eq!(err.as_bridge(), Some(BridgeError::ArraySizeOverflow));
    }

    /// Reports every array as copy-on-write storage
    struct SharedStorageDecoder;

    impl HostDecoder for SharedStorageDecoder {
        unsafe fn array_descriptor(
            &self,
            datum: Datum,
        ) -> datum_bridge_core::Result<ArrayDescriptor> {
            let mut descriptor = unsafe { NativeDecoder.array_descriptor(datum) }?;
            descriptor.shared = true;
            Ok(descriptor)
        }

        unsafe fn row_handle(&self, datum: Datum) -> datum_bridge_core::Result<NonNull<u8>> {
            unsafe { NativeDecoder.row_handle(datum) }
        }
    }

    #[test]
    fn test_shared_storage_is_read_only() {
        let mut buffer = HostArrayBuffer::from_f64(&[1.0, 2.0]).unwrap();
        let bridge = ValueBridge::with_decoder(StaticCatalog::builtin(), SharedStorageDecoder);
        let value = convert(&bridge, oid::FLOAT8_ARRAY, buffer.datum(), true)
            .unwrap()
            .unwrap();
        let mut view: TypedArrayView<'_, f64> = value.into_inner().unwrap();
        assert!(!view.is_writable());
        assert!(view.set(0, 5.0).is_err());
        assert_eq!(buffer.values_f64().unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_bridge_is_shareable_across_threads() {
        let bridge = bridge();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let bridge = &bridge;
                scope.spawn(move || {
                    let value = convert(bridge, oid::INT4, Datum::from_i32(i), false)
                        .unwrap()
                        .unwrap();
                    assert_eq!(value.try_as::<i32>().unwrap(), i);
                });
            }
        });
    }
}
