//! Typed algebraic data types on top of the dynamic variant model.
//!
//! [`adt!`](crate::adt) declares a Rust enum together with its [`Adt`] implementation, so a
//! closed set of cases gets compile-time exhaustiveness through `match` while still converting
//! losslessly to and from [`Variant`] values (and thus to and from text).
//!
//! Example
//! ```
//! use hyadt::{
//!     adt,
//!     adt::{Adt, FromValue},
//!     deserialize::deserialize,
//!     serialize::serialize,
//! };
//!
//! adt! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub enum Shape {
//!         Circle(radius: f64),
//!         Rect(width: f64, height: f64),
//!         Empty,
//!     }
//! }
//!
//! let rect = Shape::Rect { width: 2.0, height: 3.0 };
//! assert_eq!(rect.tag(), "Rect");
//!
//! let text = serialize(&rect.clone().into_value()).unwrap();
//! assert_eq!(text, "Rect 2 3");
//!
//! let decoded = deserialize(&text).unwrap().unwrap();
//! assert_eq!(Shape::from_value(&decoded), Some(rect));
//! ```
use crate::{
    eval::{Evaluator, define},
    value::{Value, Variant},
};

/// A closed sum type whose cases map one to one onto variant tags.
pub trait Adt: Sized {
    /// Name of the type.
    const NAME: &'static str;

    /// Every case tag, in declaration order.
    const TAGS: &'static [&'static str];

    /// Tag of this case.
    fn tag(&self) -> &'static str;

    fn into_variant(self) -> Variant;

    /// Decode a variant. Fails on an unknown tag, a wrong number of fields or a field of the
    /// wrong shape.
    fn from_variant(variant: &Variant) -> Option<Self>;

    #[inline]
    fn into_value(self) -> Value {
        Value::Variant(self.into_variant())
    }

    /// Evaluator holding one identity constructor per case.
    fn constructors() -> Evaluator {
        define(Self::TAGS.iter().copied())
    }
}

/// Typed extraction of a field value.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for Variant {
    fn from_value(value: &Value) -> Option<Self> {
        value.try_as_variant_ref().cloned()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    /// Only integral numbers inside the `i64` range are accepted.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Num(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Some(*n as i64),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: &Value) -> Option<Self> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl Variant {
    /// Decode this variant as the typed ADT `T`.
    #[inline]
    pub fn decode<T: Adt>(&self) -> Option<T> {
        T::from_variant(self)
    }
}

impl Evaluator {
    /// Identity constructors for every case of `T`.
    #[inline]
    pub fn for_adt<T: Adt>() -> Self {
        T::constructors()
    }
}

/// Declare an enum and implement [`Adt`](crate::adt::Adt) and
/// [`FromValue`](crate::adt::FromValue) for it.
///
/// Cases are written `Name(field: Type, ...)` or `Name`, and become struct-like enum variants.
/// Field types must convert into [`Value`](crate::value::Value) and implement `FromValue`.
#[macro_export]
macro_rules! adt {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$case_meta:meta])*
                $case:ident $( ( $( $field:ident : $ty:ty ),* $(,)? ) )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$case_meta])*
                $case $( { $( $field : $ty ),* } )?
            ),*
        }

        impl $crate::adt::Adt for $name {
            const NAME: &'static str = stringify!($name);
            const TAGS: &'static [&'static str] = &[ $( stringify!($case) ),* ];

            fn tag(&self) -> &'static str {
                match self {
                    $( Self::$case { .. } => stringify!($case), )*
                }
            }

            fn into_variant(self) -> $crate::value::Variant {
                match self {
                    $(
                        Self::$case $( { $( $field ),* } )? => $crate::value::Variant::new(
                            stringify!($case),
                            vec![ $( $( $crate::value::Value::from($field) ),* )? ],
                        ),
                    )*
                }
            }

            fn from_variant(variant: &$crate::value::Variant) -> Option<Self> {
                let mut fields = variant.fields().iter();
                let decoded = match variant.tag().as_str() {
                    $(
                        stringify!($case) => Self::$case $( {
                            $( $field: <$ty as $crate::adt::FromValue>::from_value(fields.next()?)? ),*
                        } )?,
                    )*
                    _ => return None,
                };
                match fields.next() {
                    Some(_) => None,
                    None => Some(decoded),
                }
            }
        }

        impl $crate::adt::FromValue for $name {
            fn from_value(value: &$crate::value::Value) -> Option<Self> {
                value
                    .try_as_variant_ref()
                    .and_then(<Self as $crate::adt::Adt>::from_variant)
            }
        }

        impl From<$name> for $crate::value::Value {
            fn from(value: $name) -> Self {
                $crate::value::Value::Variant(<$name as $crate::adt::Adt>::into_variant(value))
            }
        }
    };
}
