use std::{io::Cursor, str::FromStr, sync::Arc};

use parking_lot::Mutex;

use crate::{
    errors::EncodingError,
    variant::EncodingMask,
    tests::*,
};

#[test]
fn variant_scalars() {
    // Boolean
    let v = Variant::Boolean(true);
    serialize_test(v);
    // SByte
    let v = Variant::SByte(-44);
    serialize_test(v);
    // Byte
    let v = Variant::Byte(255);
    serialize_test(v);
    // Int16
    let v = Variant::Int16(-20000);
    serialize_test(v);
    // UInt16
    let v = Variant::UInt16(55778);
    serialize_test(v);
    // Int32
    let v = Variant::Int32(-9999999);
    serialize_test(v);
    // UInt32
    let v = Variant::UInt32(24424244);
    serialize_test(v);
    // Int64
    let v = Variant::Int64(-384747424424244);
    serialize_test(v);
    // UInt64
    let v = Variant::UInt64(9384747424422314244);
    serialize_test(v);
    // Float
    let v = Variant::Float(77.33f32);
    serialize_test(v);
    // Double
    let v = Variant::Double(99.123f64);
    serialize_test(v);
    // DateTime
    let v = Variant::from(DateTime::now());
    serialize_test(v);
    // UAString
    let v = Variant::from(UAString::from("Hello Everybody"));
    serialize_test(v);
    // ByteString
    let v = Variant::from(ByteString::from(b"Everything or nothing"));
    serialize_test(v);
    // XmlElement
    let v = Variant::XmlElement(XmlElement::from("The world wonders"));
    serialize_test(v);
    // Guid
    let v = Variant::from(Guid::from_str("72962B91-FA75-4AE6-8D28-B404DC7DAF63").unwrap());
    serialize_test(v);
    // NodeId
    let v = Variant::from(NodeId::new(5, 1001u32));
    serialize_test(v);
    let v = Variant::from(NodeId::new(99, "hello everyone"));
    serialize_test(v);
    // ExpandedNodeId
    let v = Variant::from(ExpandedNodeId::new(NodeId::new(200, 2000u32)));
    serialize_test(v);
    // StatusCode
    let v = Variant::from(StatusCode::BAD_UNEXPECTED_ERROR);
    serialize_test(v);
    // QualifiedName
    let v = Variant::from(QualifiedName {
        namespace_index: 100,
        name: UAString::from("this is a qualified name"),
    });
    serialize_test(v);
    // LocalizedText
    let v = Variant::from(LocalizedText {
        locale: UAString::from("Hello everyone"),
        text: UAString::from("This text is localized"),
    });
    serialize_test(v);
    // ExtensionObject
    let v = Variant::from(ExtensionObject::null());
    serialize_test(v);
    // DataValue
    let v = Variant::from(DataValue {
        value: Some(Variant::Double(1000f64)),
        status: Some(StatusCode::GOOD_CLAMPED),
        source_timestamp: Some(DateTime::now()),
        source_picoseconds: Some(333),
        server_timestamp: Some(DateTime::now()),
        server_picoseconds: Some(666),
    });
    serialize_test(v);
    // Variant in Variant
    let v = Variant::Variant(Box::new(Variant::from(8u8)));
    serialize_test(v);
    // Diagnostic
    let v = Variant::from(DiagnosticInfo {
        symbolic_id: Some(99),
        namespace_uri: Some(437437),
        locale: Some(333),
        localized_text: Some(233),
        additional_info: Some(UAString::from("Nested diagnostic")),
        inner_status_code: Some(StatusCode::GOOD),
        inner_diagnostic_info: None,
    });
    serialize_test(v);
}

#[test]
fn variant_empty() {
    // An empty variant is just the zero mask byte
    serialize_and_compare(Variant::Empty, &[0x00]);
    serialize_test(Variant::Empty);
}

#[test]
fn variant_single_dimension_array() {
    let values = vec![
        Variant::Int32(100),
        Variant::Int32(200),
        Variant::Int32(300),
    ];
    let v = Variant::from((VariantTypeId::Int32, values));
    serialize_test(v);
}

#[test]
fn variant_array_bytes() {
    // Array bit set, element count, elements in order, no dimensions block
    let v = Variant::from(vec![100i32, 200i32]);
    serialize_and_compare(
        v,
        &[
            0x86, // Int32 tag with the array bit
            0x02, 0x00, 0x00, 0x00, // count
            0x64, 0x00, 0x00, 0x00, // 100
            0xc8, 0x00, 0x00, 0x00, // 200
        ],
    );
}

#[test]
fn variant_multi_dimension_array() {
    let values = vec![
        Variant::Int32(100),
        Variant::Int32(200),
        Variant::Int32(300),
        Variant::Int32(400),
        Variant::Int32(500),
        Variant::Int32(600),
    ];
    let dimensions = vec![3u32, 2u32];
    let v = Variant::from((VariantTypeId::Int32, values, dimensions));
    serialize_test(v);
}

#[test]
fn variant_null_array() {
    // A null array encodes as the -1 count and decodes back to a null array, not an
    // empty one
    let v = Variant::from(Array::null(VariantTypeId::Boolean).unwrap());
    serialize_and_compare(v.clone(), &[0x81, 0xff, 0xff, 0xff, 0xff]);
    let decoded = serialize_test_and_return(v);
    if let Variant::Array(array) = decoded {
        assert!(array.is_null());
    } else {
        panic!("Expected an array");
    }
}

#[test]
fn variant_empty_array() {
    // An empty array encodes as a 0 count, distinct from the null array
    let v = Variant::from(Array::new_single(VariantTypeId::Boolean, Vec::new()).unwrap());
    serialize_and_compare(v.clone(), &[0x81, 0x00, 0x00, 0x00, 0x00]);
    let decoded = serialize_test_and_return(v);
    if let Variant::Array(array) = decoded {
        assert!(!array.is_null());
        assert!(array.is_empty());
    } else {
        panic!("Expected an array");
    }
}

#[test]
fn variant_unknown_tag() {
    // 26 is the first tag outside the catalog
    let bytes = [0x1a, 0x00];
    let mut stream = Cursor::new(bytes);
    let ctx = EncodingContext::test();
    assert_eq!(
        Variant::decode(&mut stream, &ctx).unwrap_err(),
        EncodingError::UnknownMask(0x1a)
    );
}

#[test]
fn variant_dimensions_bit_without_array_bit() {
    let bytes = [EncodingMask::INT32 | EncodingMask::ARRAY_DIMENSIONS_BIT, 0x00];
    let mut stream = Cursor::new(bytes);
    let ctx = EncodingContext::test();
    assert!(matches!(
        Variant::decode(&mut stream, &ctx).unwrap_err(),
        EncodingError::UnknownMask(_)
    ));
}

#[test]
fn variant_dimensions_product_mismatch() {
    // Two Int32 values but dimensions claiming 3 elements
    let mut stream = Cursor::new(Vec::new());
    let mask = EncodingMask::INT32 | EncodingMask::ARRAY_MASK;
    mask.encode(&mut stream).unwrap();
    2i32.encode(&mut stream).unwrap();
    100i32.encode(&mut stream).unwrap();
    200i32.encode(&mut stream).unwrap();
    // dimensions [3]
    1i32.encode(&mut stream).unwrap();
    3i32.encode(&mut stream).unwrap();

    let mut stream = Cursor::new(stream.into_inner());
    let ctx = EncodingContext::test();
    assert!(matches!(
        Variant::decode(&mut stream, &ctx).unwrap_err(),
        EncodingError::MalformedLength(_)
    ));
}

#[test]
fn variant_dimensions_zero() {
    // A zero dimension can never describe a real layout
    let mut stream = Cursor::new(Vec::new());
    let mask = EncodingMask::INT32 | EncodingMask::ARRAY_MASK;
    mask.encode(&mut stream).unwrap();
    1i32.encode(&mut stream).unwrap();
    100i32.encode(&mut stream).unwrap();
    // dimensions [0]
    1i32.encode(&mut stream).unwrap();
    0i32.encode(&mut stream).unwrap();

    let mut stream = Cursor::new(stream.into_inner());
    let ctx = EncodingContext::test();
    assert!(matches!(
        Variant::decode(&mut stream, &ctx).unwrap_err(),
        EncodingError::MalformedLength(_)
    ));
}

#[test]
fn variant_array_length_limit() {
    let ctx = EncodingContext {
        max_array_length: 2,
        ..EncodingContext::test()
    };
    let mut stream = Cursor::new(Vec::new());
    let mask = EncodingMask::INT32 | EncodingMask::ARRAY_VALUES_BIT;
    mask.encode(&mut stream).unwrap();
    3i32.encode(&mut stream).unwrap();

    let mut stream = Cursor::new(stream.into_inner());
    assert_eq!(
        Variant::decode(&mut stream, &ctx).unwrap_err(),
        EncodingError::LimitExceeded {
            length: 3,
            limit: 2
        }
    );
}

#[test]
fn variant_array_of_variants() {
    // A sequence of variants encodes each element as a complete variant
    use crate::encoding::write_array;
    let variants = Some(vec![
        Variant::from("foo"),
        Variant::from(255u16),
    ]);
    let mut stream = Cursor::new(Vec::new());
    write_array(&mut stream, &variants).unwrap();
    assert_eq!(
        stream.into_inner(),
        vec![
            0x02, 0x00, 0x00, 0x00, // len
            0x0c, 0x03, 0x00, 0x00, 0x00, 0x66, 0x6f, 0x6f, // foo
            0x05, 0xff, 0x00, // 255
        ]
    );
}

#[test]
fn deep_encoding() {
    let ctx = EncodingContext {
        decoding_depth_gauge: Arc::new(Mutex::new(DepthGauge::new(2))),
        ..EncodingContext::test()
    };

    let d4 = Variant::from(1);
    let d3 = Variant::Variant(Box::new(d4));
    let d2 = Variant::Variant(Box::new(d3));

    // This should decode
    let mut stream = serialize_as_stream(d2.clone());
    assert_eq!(Variant::decode(&mut stream, &ctx).unwrap(), d2);

    // This should not decode, too deep
    let d1 = Variant::Variant(Box::new(d2));
    let mut stream = serialize_as_stream(d1);
    let res = Variant::decode(&mut stream, &ctx);
    assert_eq!(res.unwrap_err(), EncodingError::DepthExceeded(2));
}

#[test]
fn depth_gauge() {
    let dg = Arc::new(Mutex::new(DepthGauge::default()));

    let max_depth = {
        let dg = trace_lock!(dg);
        dg.max_depth()
    };
    assert_eq!(max_depth, crate::constants::MAX_DECODING_DEPTH);

    // Iterate the depth
    {
        let mut v = Vec::new();
        for _ in 0..max_depth {
            v.push(DepthLock::obtain(dg.clone()).unwrap());
        }

        // Depth should now be at the maximum
        {
            let dg = trace_lock!(dg);
            assert_eq!(dg.current_depth(), max_depth);
        }

        // Next obtain should fail
        assert_eq!(
            DepthLock::obtain(dg.clone()).unwrap_err(),
            EncodingError::DepthExceeded(max_depth)
        );

        // DepthLocks drop here
    }

    // Depth should be zero
    {
        let dg = trace_lock!(dg);
        assert_eq!(dg.current_depth(), 0);
    }
}
