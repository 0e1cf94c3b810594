//! Convert a handful of host datums and print what comes back
//!
//! Run with `RUST_LOG=debug` to see unmapped types and downgraded views.
//! An optional first argument is a JSON configuration, for example
//! `'{"allow_writable_arrays": false}'`.

use datum_bridge::{
    oid, BridgeConfig, Datum, HostArrayBuffer, StaticCatalog, TypeOid, TypedArrayView,
    ValueBridge,
};

fn describe(bridge: &ValueBridge<StaticCatalog>, label: &str, type_id: TypeOid, datum: Datum) {
    // SAFETY: every datum here is either pass-by-value or points into a
    // buffer that lives until the end of main
    match unsafe { bridge.to_value(type_id, datum, false) } {
        Ok(Some(value)) => println!("   {label:<12} → {value} ({})", value.kind_of()),
        Ok(None) => println!("   {label:<12} → no decode strategy"),
        Err(err) => println!("   {label:<12} → error: {err}"),
    }
}

fn main() -> datum_bridge::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(json) => BridgeConfig::from_json(&json)?,
        None => BridgeConfig::default(),
    };
    println!("Using {config:?}");
    let bridge = ValueBridge::new(StaticCatalog::builtin()).with_config(config);

    println!("\nScalars:");
    describe(&bridge, "bool", oid::BOOL, Datum::from_bool(true));
    describe(&bridge, "int2", oid::INT2, Datum::from_i16(-7));
    describe(&bridge, "int4", oid::INT4, Datum::from_i32(65_536));
    describe(&bridge, "int8", oid::INT8, Datum::from_i64(-1 << 40));
    describe(&bridge, "float4", oid::FLOAT4, Datum::from_f32(0.25));
    describe(&bridge, "float8", oid::FLOAT8, Datum::from_f64(std::f64::consts::PI));
    describe(&bridge, "text", oid::TEXT, Datum::NULL);

    println!("\nArrays:");
    let mut values = HostArrayBuffer::from_f64(&[1.5, 2.5, 3.5])?;
    let mut matrix = HostArrayBuffer::from_elements(&[0.0f64; 4], &[2, 2], false)?;
    let mut nullable = HostArrayBuffer::from_elements(&[1.0f64, 2.0], &[2], true)?;
    let mut words = HostArrayBuffer::build(oid::TEXT, &[2], 8, &[0u8; 16], false)?;
    describe(&bridge, "float8[]", oid::FLOAT8_ARRAY, values.datum());
    describe(&bridge, "float8[][]", oid::FLOAT8_ARRAY, matrix.datum());
    describe(&bridge, "nullable", oid::FLOAT8_ARRAY, nullable.datum());
    describe(&bridge, "text[]", oid::TEXT_ARRAY, words.datum());

    println!("\nWriting through a view:");
    // SAFETY: values outlives the view and is only read after it is dropped
    let value = unsafe { bridge.to_value(oid::FLOAT8_ARRAY, values.datum(), true)? };
    if let Some(value) = value {
        let mut view: TypedArrayView<'_, f64> = value.into_inner()?;
        match view.set(1, 20.0) {
            Ok(()) => println!("   view[1] = 20"),
            Err(err) => println!("   write refused: {err}"),
        }
    }
    println!("   host buffer now {:?}", values.values_f64()?);

    Ok(())
}
