// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the generic struct / array codec.
//!
//! Structured message types are not hand coded - their layout lives in the
//! [`TypeRegistry`](crate::registry::TypeRegistry) as a [`TypeDescriptor`](crate::registry::TypeDescriptor)
//! and values travel as a [`StructValue`], a field list in declared order. Encoding walks the
//! descriptor and the value in lockstep; decoding allocates the value from the descriptor and
//! fills the fields in the same fixed order. Structs carry no mask and no built-in optionality -
//! a field that is "absent" is encoded through its own type's null form (a null string, a null
//! node id, a -1 length array), never through anything the generic codec invents.

use std::io::{Cursor, Read, Write};

use crate::{
    byte_string::ByteString,
    context::EncodingContext,
    data_value::DataValue,
    date_time::DateTime,
    diagnostic_info::DiagnosticInfo,
    encoding::*,
    errors::{EncodingError, EncodingResult},
    expanded_node_id::ExpandedNodeId,
    extension_object::ExtensionObject,
    guid::Guid,
    localized_text::LocalizedText,
    node_id::NodeId,
    qualified_name::QualifiedName,
    registry::{FieldDescriptor, FieldType},
    status_code::StatusCode,
    string::{UAString, XmlElement},
    variant::Variant,
};

/// The value of a single field of a struct value. The value-level mirror of
/// [`FieldType`](crate::registry::FieldType), plus `Array` for array-typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(UAString),
    DateTime(DateTime),
    Guid(Guid),
    ByteString(ByteString),
    XmlElement(XmlElement),
    NodeId(NodeId),
    ExpandedNodeId(ExpandedNodeId),
    StatusCode(StatusCode),
    QualifiedName(QualifiedName),
    LocalizedText(LocalizedText),
    DataValue(Box<DataValue>),
    Variant(Box<Variant>),
    DiagnosticInfo(Box<DiagnosticInfo>),
    ExtensionObject(Box<ExtensionObject>),
    Struct(Box<StructValue>),
    /// An array-typed field. `None` is the null array (-1 on the wire), distinct from an
    /// empty vector (0 on the wire).
    Array(Option<Vec<FieldValue>>),
}

impl FieldValue {
    /// The byte length of the field as encoded
    pub fn byte_len(&self) -> usize {
        match self {
            FieldValue::Boolean(v) => v.byte_len(),
            FieldValue::SByte(v) => v.byte_len(),
            FieldValue::Byte(v) => v.byte_len(),
            FieldValue::Int16(v) => v.byte_len(),
            FieldValue::UInt16(v) => v.byte_len(),
            FieldValue::Int32(v) => v.byte_len(),
            FieldValue::UInt32(v) => v.byte_len(),
            FieldValue::Int64(v) => v.byte_len(),
            FieldValue::UInt64(v) => v.byte_len(),
            FieldValue::Float(v) => v.byte_len(),
            FieldValue::Double(v) => v.byte_len(),
            FieldValue::String(v) => v.byte_len(),
            FieldValue::DateTime(v) => v.byte_len(),
            FieldValue::Guid(v) => v.byte_len(),
            FieldValue::ByteString(v) => v.byte_len(),
            FieldValue::XmlElement(v) => v.byte_len(),
            FieldValue::NodeId(v) => v.byte_len(),
            FieldValue::ExpandedNodeId(v) => v.byte_len(),
            FieldValue::StatusCode(v) => v.byte_len(),
            FieldValue::QualifiedName(v) => v.byte_len(),
            FieldValue::LocalizedText(v) => v.byte_len(),
            FieldValue::DataValue(v) => v.byte_len(),
            FieldValue::Variant(v) => v.byte_len(),
            FieldValue::DiagnosticInfo(v) => v.byte_len(),
            FieldValue::ExtensionObject(v) => v.byte_len(),
            FieldValue::Struct(v) => v.byte_len(),
            FieldValue::Array(values) => {
                let mut size = 4;
                if let Some(values) = values {
                    size += values.iter().map(|v| v.byte_len()).sum::<usize>();
                }
                size
            }
        }
    }
}

/// An instance of a structured type - the type id it is known by plus its field values in
/// declared order. The service layer builds these for requests and reads them back out of
/// responses; the codec itself only walks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructValue {
    /// The type id of the registered type the fields belong to.
    pub type_id: NodeId,
    /// Field values, in the field order of the type's descriptor.
    pub fields: Vec<FieldValue>,
}

impl StructValue {
    pub fn new(type_id: NodeId, fields: Vec<FieldValue>) -> StructValue {
        StructValue { type_id, fields }
    }

    /// The byte length of the struct as encoded - the sum of its fields, there being no
    /// header or mask of its own.
    pub fn byte_len(&self) -> usize {
        self.fields.iter().map(|f| f.byte_len()).sum()
    }
}

/// Encodes a struct value to a byte vector. The value's type must be registered in the
/// context's type registry.
pub fn encode_message(ctx: &EncodingContext, value: &StructValue) -> EncodingResult<Vec<u8>> {
    let mut stream = Cursor::new(Vec::with_capacity(value.byte_len()));
    let _ = encode_struct(ctx, value, &mut stream)?;
    Ok(stream.into_inner())
}

/// Decodes a struct value of the supplied type from a stream. The type must be registered in
/// the context's type registry or the decode fails with `UnsupportedType`.
pub fn decode_message<S: Read>(
    ctx: &EncodingContext,
    stream: &mut S,
    type_id: &NodeId,
) -> EncodingResult<StructValue> {
    decode_struct(ctx, type_id, stream)
}

/// Encodes a struct value to a stream, walking the registered descriptor and the supplied
/// fields in lockstep. A value whose arity or field kinds disagree with the descriptor is
/// rejected before anything is written for the offending field.
pub fn encode_struct<S: Write>(
    ctx: &EncodingContext,
    value: &StructValue,
    stream: &mut S,
) -> EncodingResult<usize> {
    let descriptor = ctx.registry.get(&value.type_id).ok_or_else(|| {
        error!("Type {} is not registered", value.type_id);
        EncodingError::UnsupportedType(value.type_id.to_string())
    })?;
    if descriptor.fields.len() != value.fields.len() {
        error!(
            "Value for type {} has {} fields where the descriptor has {}",
            descriptor.name,
            value.fields.len(),
            descriptor.fields.len()
        );
        return Err(EncodingError::UnsupportedType(value.type_id.to_string()));
    }
    let mut size: usize = 0;
    for (field, field_descriptor) in value.fields.iter().zip(descriptor.fields.iter()) {
        size += encode_field(ctx, field, field_descriptor, stream)?;
    }
    Ok(size)
}

/// Decodes a struct value of the registered type from a stream, field by field in declared
/// order.
pub fn decode_struct<S: Read>(
    ctx: &EncodingContext,
    type_id: &NodeId,
    stream: &mut S,
) -> EncodingResult<StructValue> {
    let descriptor = ctx.registry.get(type_id).ok_or_else(|| {
        error!("Type {} is not registered", type_id);
        EncodingError::UnsupportedType(type_id.to_string())
    })?;
    let mut fields = Vec::with_capacity(descriptor.fields.len());
    for field_descriptor in &descriptor.fields {
        fields.push(decode_field(ctx, field_descriptor, stream)?);
    }
    Ok(StructValue {
        type_id: type_id.clone(),
        fields,
    })
}

fn encode_field<S: Write>(
    ctx: &EncodingContext,
    value: &FieldValue,
    field_descriptor: &FieldDescriptor,
    stream: &mut S,
) -> EncodingResult<usize> {
    if field_descriptor.array {
        match value {
            FieldValue::Array(None) => write_i32(stream, -1),
            FieldValue::Array(Some(values)) => {
                let mut size = write_i32(stream, values.len() as i32)?;
                for value in values.iter() {
                    size += encode_scalar_field(ctx, value, &field_descriptor.field_type, stream)?;
                }
                Ok(size)
            }
            _ => {
                error!(
                    "Field {} should be an array of {}",
                    field_descriptor.name, field_descriptor.field_type
                );
                Err(EncodingError::UnsupportedType(
                    field_descriptor.field_type.to_string(),
                ))
            }
        }
    } else {
        encode_scalar_field(ctx, value, &field_descriptor.field_type, stream)
    }
}

fn decode_field<S: Read>(
    ctx: &EncodingContext,
    field_descriptor: &FieldDescriptor,
    stream: &mut S,
) -> EncodingResult<FieldValue> {
    if field_descriptor.array {
        let len = i32::decode(stream, ctx)?;
        if len == -1 {
            Ok(FieldValue::Array(None))
        } else if len < -1 {
            error!(
                "Field {} has negative array length {}",
                field_descriptor.name, len
            );
            Err(EncodingError::MalformedLength(len as i64))
        } else if len as usize > ctx.max_array_length {
            error!(
                "Field {} array length {} exceeds decoding limit {}",
                field_descriptor.name, len, ctx.max_array_length
            );
            Err(EncodingError::LimitExceeded {
                length: len as usize,
                limit: ctx.max_array_length,
            })
        } else {
            let mut values = Vec::with_capacity(len as usize);
            for _ in 0..len {
                values.push(decode_scalar_field(
                    ctx,
                    &field_descriptor.field_type,
                    stream,
                )?);
            }
            Ok(FieldValue::Array(Some(values)))
        }
    } else {
        decode_scalar_field(ctx, &field_descriptor.field_type, stream)
    }
}

fn encode_scalar_field<S: Write>(
    ctx: &EncodingContext,
    value: &FieldValue,
    field_type: &FieldType,
    stream: &mut S,
) -> EncodingResult<usize> {
    match (field_type, value) {
        (FieldType::Boolean, FieldValue::Boolean(v)) => v.encode(stream),
        (FieldType::SByte, FieldValue::SByte(v)) => v.encode(stream),
        (FieldType::Byte, FieldValue::Byte(v)) => v.encode(stream),
        (FieldType::Int16, FieldValue::Int16(v)) => v.encode(stream),
        (FieldType::UInt16, FieldValue::UInt16(v)) => v.encode(stream),
        (FieldType::Int32, FieldValue::Int32(v)) => v.encode(stream),
        (FieldType::UInt32, FieldValue::UInt32(v)) => v.encode(stream),
        (FieldType::Int64, FieldValue::Int64(v)) => v.encode(stream),
        (FieldType::UInt64, FieldValue::UInt64(v)) => v.encode(stream),
        (FieldType::Float, FieldValue::Float(v)) => v.encode(stream),
        (FieldType::Double, FieldValue::Double(v)) => v.encode(stream),
        (FieldType::String, FieldValue::String(v)) => v.encode(stream),
        (FieldType::DateTime, FieldValue::DateTime(v)) => v.encode(stream),
        (FieldType::Guid, FieldValue::Guid(v)) => v.encode(stream),
        (FieldType::ByteString, FieldValue::ByteString(v)) => v.encode(stream),
        (FieldType::XmlElement, FieldValue::XmlElement(v)) => v.encode(stream),
        (FieldType::NodeId, FieldValue::NodeId(v)) => v.encode(stream),
        (FieldType::ExpandedNodeId, FieldValue::ExpandedNodeId(v)) => v.encode(stream),
        (FieldType::StatusCode, FieldValue::StatusCode(v)) => v.encode(stream),
        (FieldType::QualifiedName, FieldValue::QualifiedName(v)) => v.encode(stream),
        (FieldType::LocalizedText, FieldValue::LocalizedText(v)) => v.encode(stream),
        (FieldType::DataValue, FieldValue::DataValue(v)) => v.encode(stream),
        (FieldType::Variant, FieldValue::Variant(v)) => v.encode(stream),
        (FieldType::DiagnosticInfo, FieldValue::DiagnosticInfo(v)) => v.encode(stream),
        (FieldType::ExtensionObject, FieldValue::ExtensionObject(v)) => v.encode(stream),
        (FieldType::Struct(type_id), FieldValue::Struct(v)) => {
            if v.type_id != *type_id {
                error!(
                    "Struct field value has type {} where the descriptor wants {}",
                    v.type_id, type_id
                );
                Err(EncodingError::UnsupportedType(v.type_id.to_string()))
            } else {
                encode_struct(ctx, v, stream)
            }
        }
        (field_type, value) => {
            error!(
                "Field value {:?} does not match descriptor type {}",
                value, field_type
            );
            Err(EncodingError::UnsupportedType(field_type.to_string()))
        }
    }
}

fn decode_scalar_field<S: Read>(
    ctx: &EncodingContext,
    field_type: &FieldType,
    stream: &mut S,
) -> EncodingResult<FieldValue> {
    let value = match field_type {
        FieldType::Boolean => FieldValue::Boolean(bool::decode(stream, ctx)?),
        FieldType::SByte => FieldValue::SByte(i8::decode(stream, ctx)?),
        FieldType::Byte => FieldValue::Byte(u8::decode(stream, ctx)?),
        FieldType::Int16 => FieldValue::Int16(i16::decode(stream, ctx)?),
        FieldType::UInt16 => FieldValue::UInt16(u16::decode(stream, ctx)?),
        FieldType::Int32 => FieldValue::Int32(i32::decode(stream, ctx)?),
        FieldType::UInt32 => FieldValue::UInt32(u32::decode(stream, ctx)?),
        FieldType::Int64 => FieldValue::Int64(i64::decode(stream, ctx)?),
        FieldType::UInt64 => FieldValue::UInt64(u64::decode(stream, ctx)?),
        FieldType::Float => FieldValue::Float(f32::decode(stream, ctx)?),
        FieldType::Double => FieldValue::Double(f64::decode(stream, ctx)?),
        FieldType::String => FieldValue::String(UAString::decode(stream, ctx)?),
        FieldType::DateTime => FieldValue::DateTime(DateTime::decode(stream, ctx)?),
        FieldType::Guid => FieldValue::Guid(Guid::decode(stream, ctx)?),
        FieldType::ByteString => FieldValue::ByteString(ByteString::decode(stream, ctx)?),
        FieldType::XmlElement => FieldValue::XmlElement(XmlElement::decode(stream, ctx)?),
        FieldType::NodeId => FieldValue::NodeId(NodeId::decode(stream, ctx)?),
        FieldType::ExpandedNodeId => {
            FieldValue::ExpandedNodeId(ExpandedNodeId::decode(stream, ctx)?)
        }
        FieldType::StatusCode => FieldValue::StatusCode(StatusCode::decode(stream, ctx)?),
        FieldType::QualifiedName => FieldValue::QualifiedName(QualifiedName::decode(stream, ctx)?),
        FieldType::LocalizedText => FieldValue::LocalizedText(LocalizedText::decode(stream, ctx)?),
        FieldType::DataValue => FieldValue::DataValue(Box::new(DataValue::decode(stream, ctx)?)),
        FieldType::Variant => FieldValue::Variant(Box::new(Variant::decode(stream, ctx)?)),
        FieldType::DiagnosticInfo => {
            FieldValue::DiagnosticInfo(Box::new(DiagnosticInfo::decode(stream, ctx)?))
        }
        FieldType::ExtensionObject => {
            FieldValue::ExtensionObject(Box::new(ExtensionObject::decode(stream, ctx)?))
        }
        FieldType::Struct(type_id) => {
            // Nested structs are depth limited to prevent deep recursion
            let _depth_lock = ctx.depth_lock()?;
            FieldValue::Struct(Box::new(decode_struct(ctx, type_id, stream)?))
        }
    };
    Ok(value)
}
