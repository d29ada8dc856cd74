//! Variant values: the tagged tuples every other module operates on.
//!
//! Role
//! - [`Tag`] names a case, [`Variant`] pairs a tag with an ordered list of fields.
//! - [`Value`] is anything a field (or a handler result) can hold: a string, a number, an
//!   array or a nested variant.
//! - [`deconstruct`] gives a uniform `{ tag, payload }` view over any value.
//!
//! The tag alone does not constrain the number of fields. Arity is a convention that only the
//! handlers consuming a variant enforce.
//!
//! Example
//! ```
//! use hyadt::value::{Value, Variant, deconstruct};
//!
//! let point = Variant::new("Point", vec![Value::from(3), Value::from(4)]);
//! assert_eq!(point.tag().as_str(), "Point");
//! assert_eq!(point.arity(), 2);
//!
//! let value = Value::from(point);
//! assert_eq!(deconstruct(&value).tag, "Point");
//! assert_eq!(deconstruct(&Value::from("hi")).tag, "string");
//! ```
use std::{borrow::Borrow, fmt, ops::Deref, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs, EnumTryAs};

use crate::deserialize::lexer::DELIMITERS;

/// Tag of the default (fallback) handler of a dispatch table.
pub const DEFAULT_TAG: &str = "_";

/// Returns `true` for names reserved to private helpers: a leading `_`, except `_` itself.
#[inline]
pub(crate) fn is_private_name(name: &str) -> bool {
    name != DEFAULT_TAG && name.starts_with('_')
}

/// Identifier selecting one case of an algebraic data type.
///
/// Tags are cheap to clone (shared `Arc<str>`). Numbers are accepted wherever a tag is expected
/// and are stored as their decimal text, so `Tag::from(3)` and `Tag::from("3")` are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Tag(Arc<str>);

impl Tag {
    /// Create a tag from its textual name.
    #[inline]
    pub fn new(name: impl AsRef<str>) -> Self {
        Tag(Arc::from(name.as_ref()))
    }

    /// The default tag `_`.
    #[inline]
    pub fn default_tag() -> Self {
        Tag::new(DEFAULT_TAG)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is exactly the default tag `_`.
    #[inline]
    pub fn is_default(&self) -> bool {
        &*self.0 == DEFAULT_TAG
    }

    /// Whether this tag is reserved for private helpers (`_name`). Private tags are never
    /// installed in a dispatch table.
    #[inline]
    pub fn is_private(&self) -> bool {
        is_private_name(&self.0)
    }

    /// Whether this tag can be written as a bare lexeme: non-empty, without whitespace, quotes,
    /// commas, parentheses or brackets. Only such tags can be serialized.
    #[inline]
    pub fn is_identifier(&self) -> bool {
        !self.0.is_empty() && !self.0.contains(|c: char| DELIMITERS.contains(c))
    }
}

impl Deref for Tag {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::new(value)
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag(Arc::from(value))
    }
}

impl From<&String> for Tag {
    fn from(value: &String) -> Self {
        Tag::new(value)
    }
}

impl From<&Tag> for Tag {
    fn from(value: &Tag) -> Self {
        value.clone()
    }
}

macro_rules! tag_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Tag {
                fn from(value: $ty) -> Self {
                    Tag::from(value.to_string())
                }
            }
        )*
    };
}

tag_from_number!(i32, i64, u32, u64, usize, f64);

/// A dynamically-typed value: a field of a variant, an argument of a handler or its result.
#[derive(Debug, Clone, PartialEq, EnumIs, EnumTryAs, EnumDiscriminants)]
#[strum_discriminants(name(ValueKind), derive(Hash))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// A string primitive.
    Str(String),

    /// A number primitive.
    Num(f64),

    /// An ordered list of values. Arrays are never reduced by an evaluator, only carried.
    Array(Vec<Value>),

    /// A nested construction.
    Variant(Variant),
}

impl ValueKind {
    /// Name reported by [`deconstruct`] for values that are not variants.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Str => "string",
            ValueKind::Num => "number",
            ValueKind::Array => "array",
            ValueKind::Variant => "variant",
        }
    }
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        ValueKind::from(self)
    }

    /// See [`deconstruct`].
    #[inline]
    pub fn deconstruct(&self) -> Deconstructed<'_> {
        deconstruct(self)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

macro_rules! value_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Num(value as f64)
                }
            }
        )*
    };
}

value_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl From<Variant> for Value {
    fn from(value: Variant) -> Self {
        Value::Variant(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Box<T>> for Value {
    fn from(value: Box<T>) -> Self {
        (*value).into()
    }
}

/// One construction: a tag plus its ordered fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variant {
    tag: Tag,
    fields: Vec<Value>,
}

impl Variant {
    /// Build a variant with the given tag and fields, in order.
    #[inline]
    pub fn new(tag: impl Into<Tag>, fields: Vec<Value>) -> Self {
        Variant {
            tag: tag.into(),
            fields,
        }
    }

    /// Build a variant without fields.
    #[inline]
    pub fn nullary(tag: impl Into<Tag>) -> Self {
        Variant::new(tag, Vec::new())
    }

    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    #[inline]
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    #[inline]
    pub fn field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Number of fields carried by this construction.
    #[inline]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn into_parts(self) -> (Tag, Vec<Value>) {
        (self.tag, self.fields)
    }
}

/// Structural view returned by [`deconstruct`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deconstructed<'a> {
    /// The variant tag, or the kind name (`"string"`, `"number"`, `"array"`) of a primitive.
    pub tag: &'a str,
    pub payload: Payload<'a>,
}

/// Payload half of [`Deconstructed`].
#[derive(Debug, Clone, Copy, PartialEq, EnumIs)]
pub enum Payload<'a> {
    /// Fields of a variant.
    Fields(&'a [Value]),
    /// The value itself, for anything that is not a variant.
    Raw(&'a Value),
}

/// Inspect a value without side effects.
///
/// For a variant, yields its tag and fields. For anything else, the tag is the name of the
/// value's kind (see [`ValueKind::name`]) and the payload is the raw value.
pub fn deconstruct(value: &Value) -> Deconstructed<'_> {
    match value {
        Value::Variant(variant) => Deconstructed {
            tag: variant.tag.as_str(),
            payload: Payload::Fields(&variant.fields),
        },
        other => Deconstructed {
            tag: other.kind().name(),
            payload: Payload::Raw(other),
        },
    }
}

/// Build a `Vec<Value>` from a heterogeneous list, converting each element with
/// [`Value::from`].
///
/// ```
/// use hyadt::{args, value::Value};
///
/// assert_eq!(args![1, "a"], vec![Value::Num(1.0), Value::Str("a".into())]);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::value::Value>::new()
    };
    ( $( $arg:expr ),+ $(,)? ) => {
        ::std::vec![ $( $crate::value::Value::from($arg) ),+ ]
    };
}
