use std::io::Cursor;

use crate::{
    errors::EncodingError,
    structure::{decode_struct, encode_struct},
    tests::*,
};

fn read_value_id_type() -> TypeDescriptor {
    TypeDescriptor::new(
        NodeId::new(0, 628u32),
        "ReadValueId",
        vec![
            FieldDescriptor::scalar("node_id", FieldType::NodeId),
            FieldDescriptor::scalar("attribute_id", FieldType::UInt32),
            FieldDescriptor::scalar("index_range", FieldType::String),
            FieldDescriptor::scalar("data_encoding", FieldType::QualifiedName),
        ],
    )
}

fn read_batch_type() -> TypeDescriptor {
    TypeDescriptor::new(
        NodeId::new(0, 631u32),
        "ReadBatch",
        vec![
            FieldDescriptor::scalar("max_age", FieldType::Double),
            FieldDescriptor::scalar("timestamps_to_return", FieldType::UInt32),
            FieldDescriptor::array("nodes_to_read", FieldType::Struct(NodeId::new(0, 628u32))),
        ],
    )
}

fn test_context() -> EncodingContext {
    let mut registry = TypeRegistry::new();
    registry.register(read_value_id_type()).unwrap();
    registry.register(read_batch_type()).unwrap();
    EncodingContext::new(registry, NamespaceTable::new())
}

fn read_value_id_value() -> StructValue {
    StructValue::new(
        NodeId::new(0, 628u32),
        vec![
            FieldValue::NodeId(NodeId::new(0, 255u32)),
            FieldValue::UInt32(13),
            FieldValue::String(UAString::null()),
            FieldValue::QualifiedName(QualifiedName::null()),
        ],
    )
}

// Encoded form of read_value_id_value() - each field in declared order with no mask, absent
// fields through their own type's null form
const READ_VALUE_ID_BYTES: [u8; 16] = [
    0x00, 0xff, // node id, two byte form
    0x0d, 0x00, 0x00, 0x00, // attribute id 13
    0xff, 0xff, 0xff, 0xff, // null index range
    0x00, 0x00, 0xff, 0xff, 0xff, 0xff, // null qualified name
];

#[test]
fn struct_encode_bytes() {
    let ctx = test_context();
    let value = read_value_id_value();

    let bytes = encode_message(&ctx, &value).unwrap();
    assert_eq!(bytes, READ_VALUE_ID_BYTES);
    assert_eq!(value.byte_len(), bytes.len());
}

#[test]
fn struct_round_trip() {
    let ctx = test_context();
    let value = read_value_id_value();

    let bytes = encode_message(&ctx, &value).unwrap();
    let mut stream = Cursor::new(bytes);
    let decoded = decode_message(&ctx, &mut stream, &NodeId::new(0, 628u32)).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn struct_array_of_structs() {
    let ctx = test_context();

    let nodes_to_read: Vec<FieldValue> = (0..10)
        .map(|_| FieldValue::Struct(Box::new(read_value_id_value())))
        .collect();
    let value = StructValue::new(
        NodeId::new(0, 631u32),
        vec![
            FieldValue::Double(0.0),
            FieldValue::UInt32(0),
            FieldValue::Array(Some(nodes_to_read)),
        ],
    );

    let bytes = encode_message(&ctx, &value).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&[0u8; 8]); // max age 0.0
    expected.extend_from_slice(&[0u8; 4]); // timestamps to return
    expected.extend_from_slice(&[0x0a, 0x00, 0x00, 0x00]); // array count
    for _ in 0..10 {
        expected.extend_from_slice(&READ_VALUE_ID_BYTES);
    }
    assert_eq!(bytes, expected);

    let mut stream = Cursor::new(bytes);
    let decoded = decode_message(&ctx, &mut stream, &NodeId::new(0, 631u32)).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn struct_null_vs_empty_array_field() {
    let ctx = test_context();

    // A null array field writes the -1 sentinel...
    let value = StructValue::new(
        NodeId::new(0, 631u32),
        vec![
            FieldValue::Double(0.0),
            FieldValue::UInt32(0),
            FieldValue::Array(None),
        ],
    );
    let bytes = encode_message(&ctx, &value).unwrap();
    assert_eq!(&bytes[12..], &[0xff, 0xff, 0xff, 0xff]);
    let mut stream = Cursor::new(bytes);
    let decoded = decode_message(&ctx, &mut stream, &NodeId::new(0, 631u32)).unwrap();
    assert_eq!(decoded.fields[2], FieldValue::Array(None));

    // ...an empty one writes a 0 count, and the two stay distinct
    let value = StructValue::new(
        NodeId::new(0, 631u32),
        vec![
            FieldValue::Double(0.0),
            FieldValue::UInt32(0),
            FieldValue::Array(Some(Vec::new())),
        ],
    );
    let bytes = encode_message(&ctx, &value).unwrap();
    assert_eq!(&bytes[12..], &[0x00, 0x00, 0x00, 0x00]);
    let mut stream = Cursor::new(bytes);
    let decoded = decode_message(&ctx, &mut stream, &NodeId::new(0, 631u32)).unwrap();
    assert_eq!(decoded.fields[2], FieldValue::Array(Some(Vec::new())));
}

#[test]
fn struct_unregistered_type() {
    let ctx = test_context();
    let unknown = NodeId::new(1, 9999u32);

    let mut stream = Cursor::new(READ_VALUE_ID_BYTES);
    assert!(matches!(
        decode_message(&ctx, &mut stream, &unknown).unwrap_err(),
        EncodingError::UnsupportedType(_)
    ));

    let value = StructValue::new(unknown, vec![]);
    assert!(matches!(
        encode_message(&ctx, &value).unwrap_err(),
        EncodingError::UnsupportedType(_)
    ));
}

#[test]
fn struct_field_mismatch() {
    let ctx = test_context();

    // Right arity, wrong kind in the second field
    let value = StructValue::new(
        NodeId::new(0, 628u32),
        vec![
            FieldValue::NodeId(NodeId::new(0, 255u32)),
            FieldValue::String(UAString::from("not a uint32")),
            FieldValue::String(UAString::null()),
            FieldValue::QualifiedName(QualifiedName::null()),
        ],
    );
    assert!(matches!(
        encode_message(&ctx, &value).unwrap_err(),
        EncodingError::UnsupportedType(_)
    ));

    // Wrong arity
    let value = StructValue::new(NodeId::new(0, 628u32), vec![FieldValue::UInt32(13)]);
    assert!(matches!(
        encode_message(&ctx, &value).unwrap_err(),
        EncodingError::UnsupportedType(_)
    ));
}

#[test]
fn struct_array_field_limit() {
    let ctx = EncodingContext {
        max_array_length: 4,
        ..test_context()
    };
    // Count of 5 on the nodes_to_read field
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0u8; 8]);
    bytes.extend_from_slice(&[0u8; 4]);
    bytes.extend_from_slice(&[0x05, 0x00, 0x00, 0x00]);
    let mut stream = Cursor::new(bytes);
    assert_eq!(
        decode_message(&ctx, &mut stream, &NodeId::new(0, 631u32)).unwrap_err(),
        EncodingError::LimitExceeded {
            length: 5,
            limit: 4
        }
    );
}

#[test]
fn registry_rejects_unregistered_struct_field() {
    let mut registry = TypeRegistry::new();
    let descriptor = TypeDescriptor::new(
        NodeId::new(0, 631u32),
        "ReadBatch",
        vec![FieldDescriptor::array(
            "nodes_to_read",
            FieldType::Struct(NodeId::new(0, 628u32)),
        )],
    );
    // ReadValueId is not registered yet
    assert!(matches!(
        registry.register(descriptor.clone()).unwrap_err(),
        EncodingError::UnsupportedType(_)
    ));

    registry.register(read_value_id_type()).unwrap();
    registry.register(descriptor).unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn registry_allows_self_reference() {
    // A recursive type may refer to itself
    let mut registry = TypeRegistry::new();
    let type_id = NodeId::new(1, 100u32);
    let descriptor = TypeDescriptor::new(
        type_id.clone(),
        "TreeNode",
        vec![
            FieldDescriptor::scalar("name", FieldType::String),
            FieldDescriptor::array("children", FieldType::Struct(type_id.clone())),
        ],
    );
    registry.register(descriptor).unwrap();
    assert!(registry.contains(&type_id));
}

#[test]
fn extension_object_from_struct() {
    let ctx = test_context();
    let value = read_value_id_value();

    let eo = ExtensionObject::from_struct(&ctx, &value).unwrap();
    assert_eq!(eo.node_id, NodeId::new(0, 628u32));

    // The body is the complete encoded struct
    assert_eq!(
        eo.body,
        ExtensionObjectEncoding::ByteString(ByteString::from(READ_VALUE_ID_BYTES.to_vec()))
    );

    // The whole extension object round trips and the body decodes back to the value
    let decoded = serialize_test_and_return(eo);
    assert_eq!(decoded.decode_struct(&ctx).unwrap(), value);
}

#[test]
fn extension_object_unknown_type_is_preserved() {
    let ctx = test_context();

    // An extension object whose type id is not registered
    let eo = ExtensionObject {
        node_id: NodeId::new(1, 9999u32),
        body: ExtensionObjectEncoding::ByteString(ByteString::from(b"\x01\x02\x03\x04")),
    };
    let bytes = eo.encode_to_vec();

    // The decode keeps the body bytes as they arrived and re-encoding reproduces them
    let mut stream = Cursor::new(bytes.clone());
    let decoded = ExtensionObject::decode(&mut stream, &ctx).unwrap();
    assert_eq!(decoded, eo);
    assert_eq!(decoded.encode_to_vec(), bytes);

    // Resolving against the registry reports the unknown type
    assert_eq!(
        decoded.decode_struct(&ctx).unwrap_err(),
        EncodingError::UnknownExtensionType("ns=1;i=9999".to_string())
    );
}

#[test]
fn nested_struct_depth_limit() {
    use parking_lot::Mutex;
    use std::sync::Arc;

    let mut registry = TypeRegistry::new();
    let type_id = NodeId::new(1, 100u32);
    registry
        .register(TypeDescriptor::new(
            type_id.clone(),
            "TreeNode",
            vec![
                FieldDescriptor::scalar("name", FieldType::String),
                FieldDescriptor::array("children", FieldType::Struct(type_id.clone())),
            ],
        ))
        .unwrap();
    let ctx = EncodingContext {
        decoding_depth_gauge: Arc::new(Mutex::new(DepthGauge::new(2))),
        ..EncodingContext::new(registry, NamespaceTable::new())
    };

    fn tree(depth: usize) -> StructValue {
        let children = if depth == 0 {
            FieldValue::Array(None)
        } else {
            FieldValue::Array(Some(vec![FieldValue::Struct(Box::new(tree(depth - 1)))]))
        };
        StructValue::new(
            NodeId::new(1, 100u32),
            vec![FieldValue::String(UAString::from("node")), children],
        )
    }

    // Two levels of nesting fits the gauge
    let bytes = encode_message(&ctx, &tree(2)).unwrap();
    let mut stream = Cursor::new(bytes);
    assert!(decode_message(&ctx, &mut stream, &NodeId::new(1, 100u32)).is_ok());

    // Three does not
    let bytes = encode_message(&ctx, &tree(3)).unwrap();
    let mut stream = Cursor::new(bytes);
    assert_eq!(
        decode_message(&ctx, &mut stream, &NodeId::new(1, 100u32)).unwrap_err(),
        EncodingError::DepthExceeded(2)
    );
}

#[test]
fn struct_with_composite_fields() {
    // Every composite kind flowing through the generic codec in one type
    let mut registry = TypeRegistry::new();
    let type_id = NodeId::new(1, 3000u32);
    registry
        .register(TypeDescriptor::new(
            type_id.clone(),
            "Everything",
            vec![
                FieldDescriptor::scalar("variant", FieldType::Variant),
                FieldDescriptor::scalar("data_value", FieldType::DataValue),
                FieldDescriptor::scalar("localized", FieldType::LocalizedText),
                FieldDescriptor::scalar("expanded", FieldType::ExpandedNodeId),
                FieldDescriptor::scalar("guid", FieldType::Guid),
                FieldDescriptor::array("statuses", FieldType::StatusCode),
                FieldDescriptor::scalar("extension", FieldType::ExtensionObject),
            ],
        ))
        .unwrap();
    let ctx = EncodingContext::new(registry, NamespaceTable::new());

    let value = StructValue::new(
        type_id.clone(),
        vec![
            FieldValue::Variant(Box::new(Variant::from(vec![1i32, 2i32, 3i32]))),
            FieldValue::DataValue(Box::new(DataValue::value_only(Variant::Boolean(true)))),
            FieldValue::LocalizedText(LocalizedText::new("en", "hello")),
            FieldValue::ExpandedNodeId(ExpandedNodeId::new(NodeId::new(2, 88u32))),
            FieldValue::Guid(Guid::null()),
            FieldValue::Array(Some(vec![
                FieldValue::StatusCode(StatusCode::GOOD),
                FieldValue::StatusCode(StatusCode::BAD_OUT_OF_RANGE),
            ])),
            FieldValue::ExtensionObject(Box::new(ExtensionObject::null())),
        ],
    );

    let bytes = encode_message(&ctx, &value).unwrap();
    assert_eq!(value.byte_len(), bytes.len());
    let mut stream = Cursor::new(bytes);
    let decoded = decode_message(&ctx, &mut stream, &type_id).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn struct_encode_to_stream() {
    // encode_struct writes to any sink and reports the bytes written
    let ctx = test_context();
    let value = read_value_id_value();
    let mut stream = Cursor::new(Vec::new());
    let size = encode_struct(&ctx, &value, &mut stream).unwrap();
    assert_eq!(size, value.byte_len());
    assert_eq!(stream.into_inner(), READ_VALUE_ID_BYTES);
}

#[test]
fn struct_decode_from_stream() {
    let ctx = test_context();
    let mut stream = Cursor::new(READ_VALUE_ID_BYTES);
    let decoded = decode_struct(&ctx, &NodeId::new(0, 628u32), &mut stream).unwrap();
    assert_eq!(decoded, read_value_id_value());
}
