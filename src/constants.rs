// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Default limits applied by an [`EncodingContext`](crate::context::EncodingContext). All of
//! them are deployment policy, not wire format - override them on the context when the
//! defaults do not fit.

/// Default maximum length in bytes of a decoded string.
pub const MAX_STRING_LENGTH: usize = 65535;
/// Default maximum length in bytes of a decoded byte string.
pub const MAX_BYTE_STRING_LENGTH: usize = 65535;
/// Default maximum number of elements in a decoded array.
pub const MAX_ARRAY_LENGTH: usize = 65535;
/// Default maximum depth for recursive elements - nested variants, extension object bodies
/// and struct fields that are themselves structs.
pub const MAX_DECODING_DEPTH: usize = 10;
/// The URI of namespace 0, reserved for the OPC UA standard namespace.
pub const OPC_UA_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";
