use bytes::BytesMut;

use crate::decode;
use crate::element::{
    AssignTo, Bool, Cidr, Element, Float4, Float8, FromNative, Inet, Int2, Int4, Int8, IsNull,
    Text, Timestamp, Uuid,
};
use crate::encode;
use crate::native::{self, NativeSource, NativeTarget};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::types::{element_count, ArrayDimension, Status};
use crate::{Error, Result};

/// A PostgreSQL array of `T`: row-major elements plus one dimension per axis.
///
/// A present array either has no dimensions and no elements (the empty
/// array) or exactly `product(lengths)` elements. Null and undefined arrays
/// hold neither.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array<T> {
    pub elements: Vec<T>,
    pub dimensions: Vec<ArrayDimension>,
    pub status: Status,
}

pub type BoolArray = Array<Bool>;
pub type Int2Array = Array<Int2>;
pub type Int4Array = Array<Int4>;
pub type Int8Array = Array<Int8>;
pub type Float4Array = Array<Float4>;
pub type Float8Array = Array<Float8>;
pub type TextArray = Array<Text>;
/// Arrays of a user-defined enum travel as text; pass the enum's array oid
/// through [`EncodeOptions::with_element_oid`].
pub type EnumArray = Array<Text>;
pub type UuidArray = Array<Uuid>;
pub type InetArray = Array<Inet>;
pub type CidrArray = Array<Cidr>;
pub type TimestampArray = Array<Timestamp>;

impl<T> Array<T> {
    pub fn null() -> Self {
        Self::from_parts(Vec::new(), Vec::new(), Status::Null)
    }

    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), Vec::new(), Status::Present)
    }

    pub(crate) fn from_parts(
        elements: Vec<T>,
        dimensions: Vec<ArrayDimension>,
        status: Status,
    ) -> Self {
        Self {
            elements,
            dimensions,
            status,
        }
    }

    /// Build a present array, rejecting element counts that disagree with
    /// `dimensions`.
    ///
    /// # Examples
    /// ```
    /// use pgarray::{ArrayDimension, Int4, Int4Array};
    ///
    /// let array = Int4Array::new(
    ///     vec![Int4::new(1), Int4::new(2)],
    ///     vec![ArrayDimension::new(2, 0)],
    /// )?;
    /// assert_eq!(array.get(&[1]), Some(&Int4::new(2)));
    /// # Ok::<(), pgarray::Error>(())
    /// ```
    pub fn new(elements: Vec<T>, dimensions: Vec<ArrayDimension>) -> Result<Self> {
        let array = Self::from_parts(elements, dimensions, Status::Present);
        array.validate()?;
        Ok(array)
    }

    /// Check the structural invariants that tie `elements`, `dimensions` and
    /// `status` together.
    pub fn validate(&self) -> Result<()> {
        match self.status {
            Status::Present => {
                let expected = element_count(&self.dimensions)?;
                if expected != self.elements.len() {
                    return Err(Error::InvalidShape(format!(
                        "{} dimensions describe {expected} elements, found {}",
                        self.dimensions.len(),
                        self.elements.len()
                    )));
                }
                if !self.dimensions.is_empty() && expected == 0 {
                    return Err(Error::InvalidShape(
                        "zero-length dimension in a non-empty dimension list".to_string(),
                    ));
                }
                Ok(())
            }
            _ if self.elements.is_empty() && self.dimensions.is_empty() => Ok(()),
            status => Err(Error::InvalidShape(format!(
                "{status:?} array carries elements or dimensions"
            ))),
        }
    }

    pub fn ndim(&self) -> usize {
        self.dimensions.len()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_null(&self) -> bool {
        self.status.is_null()
    }

    /// Element at the subscripts `index`, honouring each axis's lower bound.
    pub fn get(&self, index: &[i32]) -> Option<&T> {
        if index.len() != self.dimensions.len() || self.dimensions.is_empty() {
            return None;
        }
        let mut offset = 0usize;
        for (&subscript, dim) in index.iter().zip(&self.dimensions) {
            let relative = i64::from(subscript) - i64::from(dim.lower_bound);
            if relative < 0 || relative >= i64::from(dim.length) {
                return None;
            }
            offset = offset * dim.length as usize + relative as usize;
        }
        self.elements.get(offset)
    }
}

impl<T: Element> Array<T> {
    /// Walk a nested native value into a new array.
    ///
    /// # Examples
    /// ```
    /// use pgarray::{ArrayDimension, Int4Array};
    ///
    /// let array = Int4Array::from_native(&vec![[1, 2], [3, 4], [5, 6]])?;
    /// assert_eq!(
    ///     array.dimensions,
    ///     vec![ArrayDimension::with_length(3), ArrayDimension::with_length(2)]
    /// );
    /// # Ok::<(), pgarray::Error>(())
    /// ```
    pub fn from_native<N: NativeSource<T> + ?Sized>(native: &N) -> Result<Self> {
        native::collect(native)
    }

    /// Replace this array with `native`; on error `self` is left untouched.
    pub fn set<N: NativeSource<T> + ?Sized>(&mut self, native: &N) -> Result<()> {
        *self = native::collect(native)?;
        Ok(())
    }

    /// Write this array into a nested native destination.
    ///
    /// Shape is checked before anything is written, but an element that
    /// fails to convert part way through leaves `dst` partially filled.
    pub fn assign_to<D: NativeTarget<T> + ?Sized>(&self, dst: &mut D) -> Result<()> {
        native::distribute(self, dst)
    }

    pub fn has_null(&self) -> bool {
        self.elements
            .iter()
            .any(|element| element.status() == Status::Null)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>> {
        self.to_binary_with_options(&EncodeOptions::default())
    }

    pub fn to_binary_with_options(&self, options: &EncodeOptions) -> Result<Vec<u8>> {
        encode::to_binary(self, options)
    }

    pub fn to_text(&self) -> Result<Option<String>> {
        self.to_text_with_options(&EncodeOptions::default())
    }

    /// Text literal for this array, or `None` for a NULL array.
    pub fn to_text_with_options(&self, options: &EncodeOptions) -> Result<Option<String>> {
        encode::to_text(self, options)
    }

    pub fn from_binary(raw: &[u8], options: &DecodeOptions) -> Result<Self> {
        decode::binary::read_array(raw, options)
    }

    pub fn from_text(raw: &str, options: &DecodeOptions) -> Result<Self> {
        decode::text::parse_array(raw, options)
    }
}

impl<T: Element> Element for Array<T> {
    const TYPE_NAME: &'static str = "array";
    const TYPE_OID: u32 = T::ARRAY_TYPE_OID;
    const ARRAY_TYPE_OID: u32 = T::ARRAY_TYPE_OID;

    fn null() -> Self {
        Array::null()
    }

    fn status(&self) -> Status {
        self.status
    }

    fn encode_binary(&self, out: &mut BytesMut) -> Result<IsNull> {
        encode::binary::write_array(self, &EncodeOptions::default(), out)
    }

    fn decode_binary(raw: Option<&[u8]>) -> Result<Self> {
        match raw {
            Some(raw) => decode::binary::read_array(raw, &DecodeOptions::default()),
            None => Ok(Array::null()),
        }
    }

    fn encode_text(&self, out: &mut String) -> Result<IsNull> {
        encode::text::write_array(self, &EncodeOptions::default(), out)
    }

    fn decode_text(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(raw) => decode::text::parse_array(raw, &DecodeOptions::default()),
            None => Ok(Array::null()),
        }
    }

    fn delimiter() -> crate::Delimiter {
        T::delimiter()
    }
}

impl<T: Element, N: NativeSource<T> + ?Sized> FromNative<N> for Array<T> {
    fn from_native(value: &N) -> Result<Self> {
        native::collect(value)
    }
}

impl<T: Element, D: NativeTarget<T>> AssignTo<D> for Array<T> {
    fn assign_to(&self, dst: &mut D) -> Result<()> {
        native::distribute(self, dst)
    }
}
