// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the `TypeRegistry` of structured type descriptors and the descriptor types
//! themselves.
//!
//! A type descriptor is the ordered field list of a structured message type - request,
//! response or any other composite the protocol fixes the layout of. Registering a descriptor
//! is what makes a type id decodable inside extension objects and struct fields; the registry
//! is populated once at startup and only read afterwards.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    errors::{EncodingError, EncodingResult},
    node_id::NodeId,
};

/// The encodable type of a single field. Every built-in type can appear, as can another
/// registered structured type via `Struct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    Boolean,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    DateTime,
    Guid,
    ByteString,
    XmlElement,
    NodeId,
    ExpandedNodeId,
    StatusCode,
    QualifiedName,
    LocalizedText,
    DataValue,
    Variant,
    DiagnosticInfo,
    ExtensionObject,
    /// A nested structured type, encoded inline field by field. The node id must itself be
    /// registered before (or be the same as) the type that refers to it.
    Struct(NodeId),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Struct(type_id) => write!(f, "Struct({})", type_id),
            field_type => write!(f, "{:?}", field_type),
        }
    }
}

/// A single field of a structured type - its name, its type and whether the wire form is a
/// length-prefixed array of that type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    pub array: bool,
}

impl FieldDescriptor {
    /// A scalar field of the supplied type
    pub fn scalar<T>(name: T, field_type: FieldType) -> FieldDescriptor
    where
        T: Into<String>,
    {
        FieldDescriptor {
            name: name.into(),
            field_type,
            array: false,
        }
    }

    /// An array field of the supplied element type
    pub fn array<T>(name: T, field_type: FieldType) -> FieldDescriptor
    where
        T: Into<String>,
    {
        FieldDescriptor {
            name: name.into(),
            field_type,
            array: true,
        }
    }
}

/// The descriptor of a structured type. Field order is wire order - fields are encoded and
/// decoded exactly in the order declared here, with no mask and no padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// The node id the type is known by on the wire, e.g. inside an extension object.
    pub type_id: NodeId,
    /// The browse name of the type, for diagnostics.
    pub name: String,
    /// The fields in declared (wire) order.
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new<T>(type_id: NodeId, name: T, fields: Vec<FieldDescriptor>) -> TypeDescriptor
    where
        T: Into<String>,
    {
        TypeDescriptor {
            type_id,
            name: name.into(),
            fields,
        }
    }
}

/// Maps a numeric type id to the descriptor of the structured type it identifies. Populated
/// once at startup by the service layer; reads during encode / decode never mutate it, so a
/// registry behind an `Arc` is safe to share across any number of concurrent calls.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<NodeId, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry {
            types: HashMap::new(),
        }
    }

    /// Registers a type descriptor under its type id, making the type decodable. Any struct
    /// field must refer to an already registered type or to the type being registered, so
    /// that a registered descriptor can always be walked to completion. Re-registering a
    /// type id replaces the previous descriptor.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> EncodingResult<()> {
        for field in &descriptor.fields {
            if let FieldType::Struct(ref type_id) = field.field_type {
                if *type_id != descriptor.type_id && !self.types.contains_key(type_id) {
                    error!(
                        "Field {} of type {} refers to unregistered type {}",
                        field.name, descriptor.name, type_id
                    );
                    return Err(EncodingError::UnsupportedType(type_id.to_string()));
                }
            }
        }
        self.types
            .insert(descriptor.type_id.clone(), Arc::new(descriptor));
        Ok(())
    }

    /// Returns the descriptor registered for the type id, if there is one.
    pub fn get(&self, type_id: &NodeId) -> Option<Arc<TypeDescriptor>> {
        self.types.get(type_id).cloned()
    }

    /// Tests if the type id has a registered descriptor.
    pub fn contains(&self, type_id: &NodeId) -> bool {
        self.types.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
