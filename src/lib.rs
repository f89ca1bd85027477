// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! The OPC UA binary encoding in Rust - the mapping between the protocol's data types
//! (built-in scalars, strings, node ids, variants, extension objects and arbitrary
//! structured message types) and their byte-exact little-endian wire form.
//!
//! Values implement the [`BinaryEncoder`](crate::encoding::BinaryEncoder) trait to write
//! themselves to any `Write` sink and to read themselves back from any `Read` source.
//! Decoding is governed by an [`EncodingContext`](crate::context::EncodingContext) which
//! carries the configured string / array limits, the namespace table and the
//! [`TypeRegistry`](crate::registry::TypeRegistry) used to resolve structured message
//! types by node id.
//!
//! Transport concerns - chunking, secure channels, message headers - live elsewhere and
//! talk to this crate only through encode / decode calls.

#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::float_cmp)]
#![allow(clippy::from_over_into)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate serde_derive;

/// Tracing macro for obtaining a lock on a `Mutex`. Sometimes deadlocks can happen in code,
/// and if they do, this macro is useful for finding out where they happened.
#[macro_export]
macro_rules! trace_lock {
    ( $x:expr ) => {{
        let v = $x.lock();
        v
    }};
}

pub mod array;
pub mod basic_types;
pub mod byte_string;
pub mod constants;
pub mod context;
pub mod data_value;
pub mod date_time;
pub mod diagnostic_info;
pub mod encoding;
pub mod errors;
pub mod expanded_node_id;
pub mod extension_object;
pub mod guid;
pub mod localized_text;
pub mod node_id;
pub mod qualified_name;
pub mod registry;
pub mod status_code;
pub mod string;
pub mod structure;
pub mod variant;

#[cfg(test)]
mod tests;

pub use crate::{
    array::Array,
    byte_string::ByteString,
    context::{EncodingContext, NamespaceTable},
    data_value::DataValue,
    date_time::{DateTime, DateTimeUtc},
    diagnostic_info::DiagnosticInfo,
    encoding::{BinaryEncoder, DepthGauge, DepthLock},
    errors::{EncodingError, EncodingResult},
    expanded_node_id::ExpandedNodeId,
    extension_object::{ExtensionObject, ExtensionObjectEncoding},
    guid::Guid,
    localized_text::LocalizedText,
    node_id::{Identifier, NodeId},
    qualified_name::QualifiedName,
    registry::{FieldDescriptor, FieldType, TypeDescriptor, TypeRegistry},
    status_code::StatusCode,
    string::{UAString, XmlElement},
    structure::{decode_message, encode_message, FieldValue, StructValue},
    variant::{Variant, VariantTypeId},
};
