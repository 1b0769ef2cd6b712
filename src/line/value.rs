//! Field values
//!
//! Every type accepted by `Builder::field` converts into a [`FieldValue`],
//! which decides how the value is rendered on the wire.

use std::borrow::Cow;

/// A typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Rendered as `"..."` with inner quotes escaped
    Str(Cow<'a, str>),

    /// Rendered as `t` or `f`
    Bool(bool),

    /// Rendered with a trailing `i`
    Int(i64),

    /// Rendered with the builder's fractional precision
    Float(f64),
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(v: &'a str) -> Self {
        FieldValue::Str(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(v: &'a String) -> Self {
        FieldValue::Str(Cow::Borrowed(v.as_str()))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(v: String) -> Self {
        FieldValue::Str(Cow::Owned(v))
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

macro_rules! int_field_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue<'_> {
                fn from(v: $t) -> Self {
                    FieldValue::Int(i64::from(v))
                }
            }
        )*
    };
}

int_field_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<isize> for FieldValue<'_> {
    fn from(v: isize) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<f32> for FieldValue<'_> {
    fn from(v: f32) -> Self {
        FieldValue::Float(f64::from(v))
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}
