// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `StatusCode`.

use std::{
    fmt,
    fmt::Formatter,
    io::{Read, Write},
};

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{context::EncodingContext, encoding::*, errors::EncodingResult};

/// A numeric code describing the quality of a value or the outcome of an operation. The top
/// two bits carry the severity, the rest of the upper word identifies the condition and the
/// lower word holds informational flags.
///
/// Arbitrary codes must survive a round trip through the wire even when this crate has no name
/// for them, so the type is a transparent wrapper over the raw `u32` rather than a closed enum.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct StatusCode(u32);

impl StatusCode {
    /// The operation completed successfully.
    pub const GOOD: StatusCode = StatusCode(0x0000_0000);
    /// The value was accepted but was clamped onto a limit.
    pub const GOOD_CLAMPED: StatusCode = StatusCode(0x0030_0000);
    /// The value has been overridden locally.
    pub const GOOD_LOCAL_OVERRIDE: StatusCode = StatusCode(0x0096_0000);
    /// The value is an initial value for a variable that normally receives its value from
    /// another variable.
    pub const UNCERTAIN_INITIAL_VALUE: StatusCode = StatusCode(0x4092_0000);
    /// An unexpected error occurred.
    pub const BAD_UNEXPECTED_ERROR: StatusCode = StatusCode(0x8001_0000);
    /// The value was out of range.
    pub const BAD_OUT_OF_RANGE: StatusCode = StatusCode(0x803C_0000);
    /// Waiting for the server to obtain values from the underlying data source.
    pub const BAD_WAITING_FOR_INITIAL_DATA: StatusCode = StatusCode(0x8032_0000);

    const IS_ERROR: u32 = 0x8000_0000;
    const IS_UNCERTAIN: u32 = 0x4000_0000;
    const STATUS_MASK: u32 = 0xffff_0000;
    const BIT_MASK: u32 = 0x0000_ffff;

    pub fn from_bits(bits: u32) -> StatusCode {
        StatusCode(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Returns the informational bits of the status code, i.e. it masks out the actual status value
    pub fn bitflags(&self) -> u32 {
        self.0 & Self::BIT_MASK
    }

    /// Returns the status only, i.e. it masks out any info bits that come with the status code
    pub fn status(&self) -> StatusCode {
        StatusCode(self.0 & Self::STATUS_MASK)
    }

    /// Tests if the status code is bad
    pub fn is_bad(&self) -> bool {
        self.0 & Self::IS_ERROR != 0
    }

    /// Tests if the status code is uncertain
    pub fn is_uncertain(&self) -> bool {
        self.0 & Self::IS_UNCERTAIN != 0
    }

    /// Tests if the status code is good (i.e. not bad or uncertain)
    pub fn is_good(&self) -> bool {
        !self.is_bad() && !self.is_uncertain()
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::GOOD
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        StatusCode(value)
    }
}

impl From<StatusCode> for u32 {
    fn from(value: StatusCode) -> Self {
        value.0
    }
}

impl BinaryEncoder<StatusCode> for StatusCode {
    fn byte_len(&self) -> usize {
        4
    }

    fn encode<S: Write>(&self, stream: &mut S) -> EncodingResult<usize> {
        write_u32(stream, self.bits())
    }

    fn decode<S: Read>(stream: &mut S, _: &EncodingContext) -> EncodingResult<Self> {
        Ok(StatusCode::from_bits(read_u32(stream)?))
    }
}

// Serialize / Deserialize are manually implemented as the plain u32 wire value.

impl Serialize for StatusCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

struct StatusCodeVisitor;

impl<'de> Visitor<'de> for StatusCodeVisitor {
    type Value = u32;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an unsigned 32-bit integer")
    }

    fn visit_u32<E>(self, value: u32) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value as u32)
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as Deserializer<'de>>::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(StatusCode::from_bits(
            deserializer.deserialize_u32(StatusCodeVisitor)?,
        ))
    }
}

#[test]
fn status_code() {
    assert!(StatusCode::GOOD.is_good());
    assert!(!StatusCode::GOOD.is_bad());
    assert!(!StatusCode::GOOD.is_uncertain());

    assert!(StatusCode::UNCERTAIN_INITIAL_VALUE.is_uncertain());
    assert!(!StatusCode::UNCERTAIN_INITIAL_VALUE.is_bad());
    assert!(!StatusCode::UNCERTAIN_INITIAL_VALUE.is_good());

    assert!(StatusCode::BAD_OUT_OF_RANGE.is_bad());
    assert!(!StatusCode::BAD_OUT_OF_RANGE.is_uncertain());
    assert!(!StatusCode::BAD_OUT_OF_RANGE.is_good());

    let code = StatusCode::from_bits(StatusCode::BAD_OUT_OF_RANGE.bits() | 0x1);
    assert_eq!(code.status(), StatusCode::BAD_OUT_OF_RANGE);
    assert_eq!(code.bitflags(), 0x1);
}
