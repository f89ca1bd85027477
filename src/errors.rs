// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the error type reported by every encode and decode operation.

use thiserror::Error;

/// The reasons an encode or a decode can fail. Apart from [`EncodingError::UnknownExtensionType`],
/// which a caller may treat as recoverable by keeping the extension object's body opaque, every
/// error is fatal to the current call - the partially populated value must be discarded. Errors
/// never corrupt the [`EncodingContext`](crate::context::EncodingContext) and never affect other
/// calls sharing it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// There is no codec or registered type descriptor for the requested type.
    #[error("unsupported type {0}")]
    UnsupportedType(String),
    /// A length prefix was negative without being the -1 null sentinel, or array dimensions
    /// disagree with the number of elements actually present.
    #[error("malformed length {0}")]
    MalformedLength(i64),
    /// A NodeId, Variant or ExtensionObject encoding mask byte is outside the defined catalog.
    #[error("unknown encoding mask 0x{0:02x}")]
    UnknownMask(u8),
    /// The source ran out of bytes before the declared length of the value was satisfied.
    #[error("stream ended before the value was fully read")]
    TruncatedInput,
    /// A decoded length exceeds the limit configured on the encoding context. Checked before
    /// any buffer is allocated.
    #[error("length {length} exceeds the configured limit of {limit}")]
    LimitExceeded { length: usize, limit: usize },
    /// Decoded string bytes were not valid UTF-8.
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
    /// An extension object names a type id that is not in the type registry. The raw body
    /// bytes remain available to pass through losslessly.
    #[error("extension object type {0} is not in the type registry")]
    UnknownExtensionType(String),
    /// The output sink refused the write.
    #[error("could not write to the output stream")]
    WriteError,
    /// Nested Variants / ExtensionObjects / structures exceeded the maximum decoding depth.
    #[error("maximum decoding depth {0} exceeded")]
    DepthExceeded(usize),
}

pub type EncodingResult<T> = std::result::Result<T, EncodingError>;
