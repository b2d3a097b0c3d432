use crate::{Error, Result, Value, parse_date, parse_timestamp};
use std::{any, fmt::Display};
use time::{Date, Duration, PrimitiveDateTime};

/// Decoding of a non-null row buffer cell into a typed output.
///
/// Implementations accept the canonical storage class of the type and, where the
/// conversion is lossless, the neighboring ones (an integer stored as text, a real
/// stored as an integer). Anything else is a [`Error::Conversion`].
pub trait FromColumn: Sized {
    fn from_column(value: &Value) -> Result<Self>;
}

fn mismatch<T>(value: &Value) -> Error {
    Error::conversion(format!(
        "Cannot decode a {} column ({}) as {}",
        value.type_name(),
        value,
        any::type_name::<T>()
    ))
}

fn out_of_range<T>(value: impl Display) -> Error {
    Error::conversion(format!(
        "Value {} is out of range for {}",
        value,
        any::type_name::<T>()
    ))
}

macro_rules! impl_from_column_integer {
    ($($target:ty),+ $(,)?) => {$(
        impl FromColumn for $target {
            fn from_column(value: &Value) -> Result<Self> {
                let v = match value {
                    Value::Integer(v) => *v,
                    Value::Real(v) if v.fract() == 0.0 => {
                        if !(i64::MIN as f64..i64::MAX as f64).contains(v) {
                            return Err(out_of_range::<Self>(v));
                        }
                        *v as i64
                    }
                    Value::Text(v) => v.trim().parse::<i64>().map_err(|_| mismatch::<Self>(value))?,
                    _ => return Err(mismatch::<Self>(value)),
                };
                <$target>::try_from(v).map_err(|_| out_of_range::<Self>(v))
            }
        }
    )+};
}

impl_from_column_integer!(i16, i32, i64);

macro_rules! impl_from_column_float {
    ($($target:ty),+ $(,)?) => {$(
        impl FromColumn for $target {
            fn from_column(value: &Value) -> Result<Self> {
                match value {
                    Value::Real(v) => Ok(*v as _),
                    Value::Integer(v) => Ok(*v as _),
                    Value::Text(v) => v.trim().parse::<$target>().map_err(|_| mismatch::<Self>(value)),
                    _ => Err(mismatch::<Self>(value)),
                }
            }
        }
    )+};
}

impl_from_column_float!(f32, f64);

impl FromColumn for bool {
    fn from_column(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(v) => Ok(*v != 0),
            Value::Text(v) => match v.trim() {
                "1" | "true" | "TRUE" | "t" => Ok(true),
                "0" | "false" | "FALSE" | "f" => Ok(false),
                _ => Err(mismatch::<Self>(value)),
            },
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromColumn for String {
    fn from_column(value: &Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            Value::Integer(v) => Ok(v.to_string()),
            Value::Real(v) => Ok(v.to_string()),
            Value::Blob(v) => String::from_utf8(v.to_vec()).map_err(|_| mismatch::<Self>(value)),
            Value::Null => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromColumn for Vec<u8> {
    fn from_column(value: &Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v.to_vec()),
            Value::Text(v) => Ok(v.as_bytes().to_vec()),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromColumn for Box<[u8]> {
    fn from_column(value: &Value) -> Result<Self> {
        Vec::<u8>::from_column(value).map(Vec::into_boxed_slice)
    }
}

impl FromColumn for PrimitiveDateTime {
    fn from_column(value: &Value) -> Result<Self> {
        match value {
            Value::Text(v) => parse_timestamp(v),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromColumn for Date {
    fn from_column(value: &Value) -> Result<Self> {
        match value {
            Value::Text(v) => parse_date(v),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

/// Durations are stored as a 64-bit count of milliseconds.
impl FromColumn for Duration {
    fn from_column(value: &Value) -> Result<Self> {
        i64::from_column(value).map(Duration::milliseconds)
    }
}

impl FromColumn for Value {
    fn from_column(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}
