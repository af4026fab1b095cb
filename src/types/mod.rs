mod array;
mod delimiter;
mod dimension;
mod status;

pub use array::{
    Array, BoolArray, CidrArray, EnumArray, Float4Array, Float8Array, InetArray, Int2Array,
    Int4Array, Int8Array, TextArray, TimestampArray, UuidArray,
};
pub use delimiter::Delimiter;
pub use dimension::{element_count, validate_rectangular, ArrayDimension, ShapeProbe};
pub use status::Status;
