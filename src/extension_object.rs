// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `ExtensionObject`.

use std::io::{Cursor, Read, Write};

use crate::{
    byte_string::ByteString,
    context::EncodingContext,
    encoding::*,
    errors::{EncodingError, EncodingResult},
    node_id::NodeId,
    string::XmlElement,
    structure::{self, StructValue},
};

/// Enumeration that holds the kinds of encoding that an ExtensionObject data may be encoded with.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum ExtensionObjectEncoding {
    /// For an extension object with nothing encoded with it
    None,
    /// For an extension object with data encoded in a ByteString
    ByteString(ByteString),
    /// For an extension object with data encoded in an XML string
    XmlElement(XmlElement),
}

/// An extension object holds a serialized object identified by its node id. Decoding always
/// preserves the body as the raw bytes that arrived - an unknown type id therefore passes
/// through losslessly. The body of a known type can be resolved against the type registry
/// with [`ExtensionObject::decode_struct`].
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionObject {
    pub node_id: NodeId,
    pub body: ExtensionObjectEncoding,
}

impl Default for ExtensionObject {
    fn default() -> Self {
        Self::null()
    }
}

impl BinaryEncoder<ExtensionObject> for ExtensionObject {
    fn byte_len(&self) -> usize {
        let mut size = self.node_id.byte_len();
        size += match self.body {
            ExtensionObjectEncoding::None => 1,
            ExtensionObjectEncoding::ByteString(ref value) => {
                // Encoding mask + data
                1 + value.byte_len()
            }
            ExtensionObjectEncoding::XmlElement(ref value) => {
                // Encoding mask + data
                1 + value.byte_len()
            }
        };
        size
    }

    fn encode<S: Write>(&self, stream: &mut S) -> EncodingResult<usize> {
        let mut size = 0;
        size += self.node_id.encode(stream)?;
        match self.body {
            ExtensionObjectEncoding::None => {
                size += write_u8(stream, 0x0)?;
            }
            ExtensionObjectEncoding::ByteString(ref value) => {
                // Encoding mask + data
                size += write_u8(stream, 0x1)?;
                size += value.encode(stream)?;
            }
            ExtensionObjectEncoding::XmlElement(ref value) => {
                // Encoding mask + data
                size += write_u8(stream, 0x2)?;
                size += value.encode(stream)?;
            }
        }
        assert_eq!(size, self.byte_len());
        Ok(size)
    }

    fn decode<S: Read>(stream: &mut S, ctx: &EncodingContext) -> EncodingResult<Self> {
        // Extension object is depth checked to prevent deep recursion
        let _depth_lock = ctx.depth_lock()?;
        let node_id = NodeId::decode(stream, ctx)?;
        let encoding_type = u8::decode(stream, ctx)?;
        let body = match encoding_type {
            0x0 => ExtensionObjectEncoding::None,
            0x1 => ExtensionObjectEncoding::ByteString(ByteString::decode(stream, ctx)?),
            0x2 => ExtensionObjectEncoding::XmlElement(XmlElement::decode(stream, ctx)?),
            _ => {
                error!("Invalid encoding type {} in stream", encoding_type);
                return Err(EncodingError::UnknownMask(encoding_type));
            }
        };
        Ok(ExtensionObject { node_id, body })
    }
}

impl ExtensionObject {
    /// Creates a null extension object, i.e. one with no value or payload
    pub fn null() -> ExtensionObject {
        ExtensionObject {
            node_id: NodeId::null(),
            body: ExtensionObjectEncoding::None,
        }
    }

    /// Tests for null node id.
    pub fn is_null(&self) -> bool {
        self.node_id.is_null()
    }

    /// Tests for empty body.
    pub fn is_empty(&self) -> bool {
        self.is_null() || matches!(self.body, ExtensionObjectEncoding::None)
    }

    /// Creates an extension object with the specified node id and the encodable object as its payload.
    /// The body is set to a byte string containing the encoded struct.
    pub fn from_encodable<N, T>(node_id: N, encodable: &T) -> ExtensionObject
    where
        N: Into<NodeId>,
        T: BinaryEncoder<T>,
    {
        // Serialize to extension object
        let mut stream = Cursor::new(Vec::with_capacity(encodable.byte_len()));
        let _ = encodable.encode(&mut stream);
        ExtensionObject {
            node_id: node_id.into(),
            body: ExtensionObjectEncoding::ByteString(ByteString::from(stream.into_inner())),
        }
    }

    /// Creates an extension object from a struct value. The struct's type must be in the
    /// context's type registry and its type id becomes the extension object's node id.
    pub fn from_struct(ctx: &EncodingContext, value: &StructValue) -> EncodingResult<ExtensionObject> {
        let body = structure::encode_message(ctx, value)?;
        Ok(ExtensionObject {
            node_id: value.type_id.clone(),
            body: ExtensionObjectEncoding::ByteString(ByteString::from(body)),
        })
    }

    /// Decodes the body into a struct value through the type descriptor registered for the
    /// extension object's node id. A node id the registry does not recognise yields an
    /// `UnknownExtensionType` error and leaves the object untouched - callers that want the
    /// lossless passthrough behaviour simply keep the object as is.
    pub fn decode_struct(&self, ctx: &EncodingContext) -> EncodingResult<StructValue> {
        if !ctx.registry.contains(&self.node_id) {
            return Err(EncodingError::UnknownExtensionType(
                self.node_id.to_string(),
            ));
        }
        match self.body {
            ExtensionObjectEncoding::ByteString(ref byte_string) => {
                if let Some(ref value) = byte_string.value {
                    let mut stream = Cursor::new(value);
                    structure::decode_struct(ctx, &self.node_id, &mut stream)
                } else {
                    error!("decode_struct called on an extension object with a null body");
                    Err(EncodingError::MalformedLength(-1))
                }
            }
            _ => {
                error!("decode_struct called on an unsupported ExtensionObject body");
                Err(EncodingError::UnsupportedType(self.node_id.to_string()))
            }
        }
    }

    /// Decodes the inner content of the extension object and returns it. The node id is ignored
    /// for decoding. The caller supplies the binary encoder impl that should be used to extract
    /// the data. Errors result in a decoding error.
    pub fn decode_inner<T>(&self, ctx: &EncodingContext) -> EncodingResult<T>
    where
        T: BinaryEncoder<T>,
    {
        match self.body {
            ExtensionObjectEncoding::ByteString(ref byte_string) => {
                if let Some(ref value) = byte_string.value {
                    let mut stream = Cursor::new(value);
                    T::decode(&mut stream, ctx)
                } else {
                    error!("decode_inner called on an extension object with a null body");
                    Err(EncodingError::MalformedLength(-1))
                }
            }
            _ => {
                error!("decode_inner called on an unsupported ExtensionObject type");
                Err(EncodingError::UnsupportedType(self.node_id.to_string()))
            }
        }
    }
}
