// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the `Array` holder used by array-valued `Variant`s.

use crate::{
    errors::{EncodingError, EncodingResult},
    variant::{EncodingMask, Variant, VariantTypeId},
};

/// An array is an optional vector of values with an optional number of dimensions. All values
/// must be scalars of the one `value_type` - nested arrays are rejected.
///
/// A null array (`values` is `None`, length -1 on the wire) is distinct from an empty array
/// (`values` is an empty vector, length 0 on the wire) and both survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Array {
    /// Type of elements in the array
    pub value_type: VariantTypeId,

    /// Values are stored sequentially, or not at all for a null array
    pub values: Option<Vec<Variant>>,

    /// Multi dimension array which can contain any scalar type, all the same type. Nested
    /// arrays are rejected. Higher rank dimensions are serialized first. For example an array
    /// with dimensions [2,2,2] is written in this order - [0,0,0], [0,0,1], [0,1,0], [0,1,1],
    /// [1,0,0], [1,0,1], [1,1,0], [1,1,1].
    pub dimensions: Vec<u32>,
}

impl Array {
    /// Constructs a single dimension array from the supplied values
    pub fn new_single<V>(value_type: VariantTypeId, values: V) -> EncodingResult<Array>
    where
        V: Into<Vec<Variant>>,
    {
        let values = values.into();
        Self::validate_array_type_to_values(value_type, &values)?;
        Ok(Array {
            value_type,
            values: Some(values),
            dimensions: Vec::new(),
        })
    }

    /// Constructs a multi dimension array from the supplied values. The product of the
    /// dimensions must equal the number of values.
    pub fn new_multi<V, D>(
        value_type: VariantTypeId,
        values: V,
        dimensions: D,
    ) -> EncodingResult<Array>
    where
        V: Into<Vec<Variant>>,
        D: Into<Vec<u32>>,
    {
        let values = values.into();
        let dimensions = dimensions.into();
        Self::validate_array_type_to_values(value_type, &values)?;
        let expected = checked_dimensions_product(&dimensions)?;
        if expected as usize != values.len() {
            error!(
                "Array dimensions product {} does not match value count {}",
                expected,
                values.len()
            );
            return Err(EncodingError::MalformedLength(values.len() as i64));
        }
        Ok(Array {
            value_type,
            values: Some(values),
            dimensions,
        })
    }

    /// Constructs a null array of the type - one that encodes as the -1 length sentinel,
    /// which is not the same as an array with no elements.
    pub fn null(value_type: VariantTypeId) -> EncodingResult<Array> {
        if matches!(value_type, VariantTypeId::Empty | VariantTypeId::Array) {
            error!("Invalid array type supplied");
            return Err(EncodingError::UnsupportedType(format!("{:?}", value_type)));
        }
        Ok(Array {
            value_type,
            values: None,
            dimensions: Vec::new(),
        })
    }

    /// This is a runtime check to ensure the type of the array also matches the types of the
    /// variants in the array.
    fn validate_array_type_to_values(
        value_type: VariantTypeId,
        values: &[Variant],
    ) -> EncodingResult<()> {
        match value_type {
            VariantTypeId::Array | VariantTypeId::Empty => {
                error!("Invalid array type supplied");
                Err(EncodingError::UnsupportedType(format!("{:?}", value_type)))
            }
            _ => {
                if !values_are_of_type(values, value_type) {
                    // If the values exist, then validate them to the type
                    error!("Value type of array does not match contents");
                    Err(EncodingError::UnsupportedType(format!("{:?}", value_type)))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Tests if this is a null array, i.e. absent rather than empty
    pub fn is_null(&self) -> bool {
        self.values.is_none()
    }

    /// The number of values held, or 0 for a null array
    pub fn len(&self) -> usize {
        self.values.as_ref().map_or(0, |v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_dimensions(&self) -> bool {
        !self.dimensions.is_empty()
    }

    pub fn encoding_mask(&self) -> u8 {
        let mut encoding_mask = self.value_type.encoding_mask();
        encoding_mask |= EncodingMask::ARRAY_VALUES_BIT;
        if self.has_dimensions() {
            encoding_mask |= EncodingMask::ARRAY_DIMENSIONS_BIT;
        }
        encoding_mask
    }
}

/// Computes the total element count described by array dimensions. A zero dimension or an
/// overflowing product is rejected - both turn up in malicious streams.
pub(crate) fn checked_dimensions_product(dimensions: &[u32]) -> EncodingResult<u32> {
    let mut product = 1u32;
    for d in dimensions {
        if *d == 0 {
            error!("Invalid array dimension 0");
            return Err(EncodingError::MalformedLength(0));
        }
        product = product.checked_mul(*d).ok_or_else(|| {
            error!("Array dimension overflow!");
            EncodingError::MalformedLength(i64::from(*d))
        })?;
    }
    Ok(product)
}

/// Check that all elements in the slice are of the expected type.
pub fn values_are_of_type(values: &[Variant], expected_type: VariantTypeId) -> bool {
    // Ensure all elements are the same type as the expected type
    let found_unexpected = values.iter().any(|v| v.type_id() != expected_type);
    if found_unexpected {
        error!(
            "Variant array's type is expected to be {:?} but found other types in it",
            expected_type
        );
    };
    !found_unexpected
}
