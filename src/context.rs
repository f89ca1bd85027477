// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the `EncodingContext` passed into every decode call, and the namespace table it
//! carries.

use std::sync::Arc;

use chrono::Duration;
use parking_lot::Mutex;

use crate::{
    constants,
    encoding::{DepthGauge, DepthLock},
    errors::EncodingResult,
    registry::TypeRegistry,
};

/// The ordered list of namespace URIs known to a session. A namespace index inside a `NodeId`
/// is a position in this table. Index 0 is always the OPC UA standard namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceTable {
    uris: Vec<String>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self {
            uris: vec![constants::OPC_UA_NAMESPACE_URI.to_string()],
        }
    }
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the URI registered at the supplied index.
    pub fn uri(&self, index: u16) -> Option<&str> {
        self.uris.get(index as usize).map(|uri| uri.as_str())
    }

    /// Returns the index of the supplied URI if it is in the table.
    pub fn index_of(&self, uri: &str) -> Option<u16> {
        self.uris.iter().position(|v| v == uri).map(|idx| idx as u16)
    }

    /// Adds a URI to the table, returning its index. Adding a URI that is already present
    /// returns the existing index rather than creating a duplicate entry.
    pub fn add(&mut self, uri: &str) -> u16 {
        if let Some(index) = self.index_of(uri) {
            index
        } else {
            self.uris.push(uri.to_string());
            (self.uris.len() - 1) as u16
        }
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

/// Everything a decode needs to know beyond the bytes themselves - the type registry used to
/// resolve structured message types, the namespace table, the configured size limits and the
/// client clock offset. Built once per process or per connection and shared by reference;
/// nothing on it mutates during encode or decode apart from the depth gauge, which only tracks
/// the recursion depth of the call currently in flight.
#[derive(Debug, Clone)]
pub struct EncodingContext {
    /// Registry of structured type descriptors, populated once at startup.
    pub registry: Arc<TypeRegistry>,
    /// The namespace URI table. Index 0 is the OPC UA standard namespace.
    pub namespaces: NamespaceTable,
    /// Time offset between the client and the server, only used by the client when it's configured
    /// to ignore time skew.
    pub client_offset: Duration,
    /// Maximum length in bytes (not chars!) of a string. 0 actually means 0, i.e. no string permitted
    pub max_string_length: usize,
    /// Maximum length in bytes of a byte string. 0 actually means 0, i.e. no byte string permitted
    pub max_byte_string_length: usize,
    /// Maximum number of array elements. 0 actually means 0, i.e. no array permitted
    pub max_array_length: usize,
    /// Decoding depth gauge is used to check for recursion
    pub decoding_depth_gauge: Arc<Mutex<DepthGauge>>,
}

impl Default for EncodingContext {
    fn default() -> Self {
        EncodingContext {
            registry: Arc::new(TypeRegistry::new()),
            namespaces: NamespaceTable::default(),
            client_offset: Duration::zero(),
            max_string_length: constants::MAX_STRING_LENGTH,
            max_byte_string_length: constants::MAX_BYTE_STRING_LENGTH,
            max_array_length: constants::MAX_ARRAY_LENGTH,
            decoding_depth_gauge: Arc::new(Mutex::new(DepthGauge::default())),
        }
    }
}

impl EncodingContext {
    /// Creates a context around a populated registry and namespace table, with default limits.
    pub fn new(registry: TypeRegistry, namespaces: NamespaceTable) -> Self {
        EncodingContext {
            registry: Arc::new(registry),
            namespaces,
            ..Default::default()
        }
    }

    /// This can be useful for decoding extension objects where the payload is not expected to
    /// contain a large value.
    pub fn minimal() -> Self {
        EncodingContext {
            max_string_length: 8192,
            max_byte_string_length: 8192,
            max_array_length: 8192,
            decoding_depth_gauge: Arc::new(Mutex::new(DepthGauge::minimal())),
            ..Default::default()
        }
    }

    /// For test only. Having a separate function makes it easier to control calls to
    /// EncodingContext::default().
    #[cfg(test)]
    pub fn test() -> Self {
        Self::default()
    }

    pub fn depth_lock(&self) -> EncodingResult<DepthLock> {
        DepthLock::obtain(self.decoding_depth_gauge.clone())
    }
}
