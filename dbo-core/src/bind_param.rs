use std::{
    borrow::Cow,
    fmt::{self, Display},
};
use time::{Date, Duration, PrimitiveDateTime};

/// One positional argument waiting to be attached to a placeholder.
///
/// Text and blob payloads are always owned: the value is attached to the native
/// statement only when it executes, which may happen after the caller's value is gone.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum BindParam {
    #[default]
    Null,
    Short(i16),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Text(String),
    Blob(Box<[u8]>),
    Timestamp(PrimitiveDateTime),
    Date(Date),
    /// Stored by the backend as a count of milliseconds.
    Duration(Duration),
}

impl BindParam {
    pub fn is_null(&self) -> bool {
        matches!(self, BindParam::Null)
    }

    /// Name of the active variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            BindParam::Null => "Null",
            BindParam::Short(..) => "Short",
            BindParam::Int32(..) => "Int32",
            BindParam::Int64(..) => "Int64",
            BindParam::Double(..) => "Double",
            BindParam::Text(..) => "Text",
            BindParam::Blob(..) => "Blob",
            BindParam::Timestamp(..) => "Timestamp",
            BindParam::Date(..) => "Date",
            BindParam::Duration(..) => "Duration",
        }
    }
}

/// Conversion of a native Rust value into a [`BindParam`].
///
/// ```rust
/// use dbo_core::{AsBindParam, BindParam};
/// assert_eq!(42i32.as_bind_param(), BindParam::Int32(42));
/// assert_eq!(None::<i64>.as_bind_param(), BindParam::Null);
/// ```
pub trait AsBindParam {
    fn as_bind_param(self) -> BindParam;
}

impl AsBindParam for BindParam {
    fn as_bind_param(self) -> BindParam {
        self
    }
}

macro_rules! impl_as_bind_param {
    (@convert $value:ident) => { $value };
    (@convert $value:ident, $conversion:expr) => { ($conversion)($value) };
    ($source:ty, $destination:path $(, $conversion:expr)? $(,)?) => {
        impl AsBindParam for $source {
            fn as_bind_param(self) -> BindParam {
                $destination(impl_as_bind_param!(@convert self $(, $conversion)?))
            }
        }
        impl From<$source> for BindParam {
            fn from(value: $source) -> Self {
                value.as_bind_param()
            }
        }
    };
}

impl_as_bind_param!(i16, BindParam::Short);
impl_as_bind_param!(i32, BindParam::Int32);
impl_as_bind_param!(i64, BindParam::Int64);
impl_as_bind_param!(f32, BindParam::Double, |v: f32| v as f64);
impl_as_bind_param!(f64, BindParam::Double);
impl_as_bind_param!(bool, BindParam::Short, |v: bool| v as i16);
impl_as_bind_param!(String, BindParam::Text);
impl_as_bind_param!(&str, BindParam::Text, |v: &str| v.to_owned());
impl_as_bind_param!(Cow<'_, str>, BindParam::Text, Cow::into_owned);
impl_as_bind_param!(Box<[u8]>, BindParam::Blob);
impl_as_bind_param!(Vec<u8>, BindParam::Blob, Vec::into_boxed_slice);
impl_as_bind_param!(&[u8], BindParam::Blob, Box::<[u8]>::from);
impl_as_bind_param!(PrimitiveDateTime, BindParam::Timestamp);
impl_as_bind_param!(Date, BindParam::Date);
impl_as_bind_param!(Duration, BindParam::Duration);

impl<T: AsBindParam> AsBindParam for Option<T> {
    fn as_bind_param(self) -> BindParam {
        match self {
            Some(v) => v.as_bind_param(),
            None => BindParam::Null,
        }
    }
}

impl<T: AsBindParam> From<Option<T>> for BindParam {
    fn from(value: Option<T>) -> Self {
        value.as_bind_param()
    }
}

impl Display for BindParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindParam::Null => f.write_str("NULL"),
            BindParam::Short(v) => write!(f, "{}", v),
            BindParam::Int32(v) => write!(f, "{}", v),
            BindParam::Int64(v) => write!(f, "{}", v),
            BindParam::Double(v) => write!(f, "{}", v),
            BindParam::Text(v) => write!(f, "'{}'", v),
            BindParam::Blob(v) => write!(f, "<blob {} bytes>", v.len()),
            BindParam::Timestamp(v) => write!(f, "{}", v),
            BindParam::Date(v) => write!(f, "{}", v),
            BindParam::Duration(v) => write!(f, "{}ms", v.whole_milliseconds()),
        }
    }
}
