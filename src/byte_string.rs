// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `ByteString`.

use std::{
    fmt,
    io::{Read, Write},
};

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    context::EncodingContext,
    encoding::{process_decode_io_result, process_encode_io_result, write_i32, BinaryEncoder},
    errors::{EncodingError, EncodingResult},
};

/// A sequence of octets.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct ByteString {
    pub value: Option<Vec<u8>>,
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        match self.value {
            Some(ref value) => value,
            None => &[],
        }
    }
}

impl Serialize for ByteString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.value.is_some() {
            serializer.serialize_str(&self.as_base64())
        } else {
            serializer.serialize_none()
        }
    }
}

struct ByteStringVisitor;

impl<'de> de::Visitor<'de> for ByteStringVisitor {
    type Value = ByteString;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a base64 encoded string value or null")
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Self::Value::null())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Self::Value::from_base64(v)
            .ok_or_else(|| de::Error::custom("Cannot decode base64 bytestring"))
    }
}

impl<'de> Deserialize<'de> for ByteString {
    fn deserialize<D>(deserializer: D) -> Result<ByteString, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(ByteStringVisitor)
    }
}

impl BinaryEncoder<ByteString> for ByteString {
    fn byte_len(&self) -> usize {
        // Length plus the actual length of bytes (if not null)
        4 + match self.value {
            Some(ref value) => value.len(),
            None => 0,
        }
    }

    fn encode<S: Write>(&self, stream: &mut S) -> EncodingResult<usize> {
        // Byte strings are encoded as raw bytes preceded by an Int32 length. A -1 indicates a null value
        match self.value {
            None => write_i32(stream, -1),
            Some(ref value) => {
                let mut size: usize = 0;
                size += write_i32(stream, value.len() as i32)?;
                size += process_encode_io_result(stream.write(value))?;
                assert_eq!(size, self.byte_len());
                Ok(size)
            }
        }
    }

    fn decode<S: Read>(stream: &mut S, ctx: &EncodingContext) -> EncodingResult<Self> {
        let len = i32::decode(stream, ctx)?;
        // Null string?
        if len == -1 {
            Ok(ByteString::null())
        } else if len < -1 {
            error!("ByteString buf length is a negative number {}", len);
            Err(EncodingError::MalformedLength(len as i64))
        } else if len as usize > ctx.max_byte_string_length {
            error!(
                "ByteString length {} exceeds decoding limit {}",
                len, ctx.max_byte_string_length
            );
            Err(EncodingError::LimitExceeded {
                length: len as usize,
                limit: ctx.max_byte_string_length,
            })
        } else {
            // Create a buffer filled with zeroes and read the byte string over the top
            let mut buf: Vec<u8> = vec![0u8; len as usize];
            process_decode_io_result(stream.read_exact(&mut buf))?;
            Ok(ByteString { value: Some(buf) })
        }
    }
}

impl<'a, T> From<&'a T> for ByteString
where
    T: AsRef<[u8]> + ?Sized,
{
    fn from(value: &'a T) -> Self {
        Self::from(value.as_ref().to_vec())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        ByteString { value: Some(value) }
    }
}

impl Default for ByteString {
    fn default() -> Self {
        ByteString::null()
    }
}

impl ByteString {
    /// Create a null byte string (not the same as an empty byte string).
    pub fn null() -> ByteString {
        ByteString { value: None }
    }

    /// Test if the byte string is null.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Test if the byte string is null or empty.
    pub fn is_empty(&self) -> bool {
        match self.value {
            None => true,
            Some(ref v) => v.is_empty(),
        }
    }

    /// Returns the length of the byte string in bytes or -1 for null.
    pub fn len(&self) -> isize {
        match self.value {
            None => -1,
            Some(ref v) => v.len() as isize,
        }
    }

    /// Creates a byte string from a base64 encoded string
    pub fn from_base64(data: &str) -> Option<ByteString> {
        STANDARD.decode(data).map(ByteString::from).ok()
    }

    /// Encodes the bytes as a base64 encoded string
    pub fn as_base64(&self) -> String {
        // Base64 encodes the byte string so it can be represented as a string
        match self.value {
            Some(ref value) => STANDARD.encode(value),
            None => STANDARD.encode(""),
        }
    }
}

#[test]
fn byte_string_null() {
    let v = ByteString::null();
    assert!(v.is_null());
    assert!(v.is_empty());
    assert_eq!(v.len(), -1);
}

#[test]
fn byte_string_base64() {
    let v = ByteString::from(b"hello world");
    let base64 = v.as_base64();
    assert_eq!(base64, "aGVsbG8gd29ybGQ=");
    assert_eq!(ByteString::from_base64(&base64).unwrap(), v);
}
