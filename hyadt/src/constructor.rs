//! Constructor factory: pure values that stamp out [`Variant`]s for one tag.
//!
//! A [`Constructor`] is immutable and has no side effects: calling it always succeeds and
//! returns a fresh variant whose fields are the call arguments, in order. Rust has no variadic
//! functions, so the arguments are passed as any iterator of values; the [`args!`](crate::args)
//! macro converts a heterogeneous list in place.
//!
//! Example
//! ```
//! use hyadt::{args, constructor::make_constructor, value::Value};
//!
//! let point = make_constructor("Point");
//! let p = point.call(args![3, 4]);
//! assert_eq!(p.tag().as_str(), "Point");
//! assert_eq!(p.fields(), &[Value::from(3), Value::from(4)]);
//! ```
use std::fmt;

use crate::value::{Tag, Value, Variant};

/// Builds variants of a single tag.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Constructor {
    tag: Tag,
}

impl Constructor {
    #[inline]
    pub fn new(tag: impl Into<Tag>) -> Self {
        Constructor { tag: tag.into() }
    }

    /// Tag stamped on every variant built by this constructor.
    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Build a variant whose fields are `args`, in order.
    pub fn call<I>(&self, args: I) -> Variant
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Variant::new(self.tag.clone(), args.into_iter().map(Into::into).collect())
    }

    /// Same as [`call`](Self::call), wrapped as a [`Value`].
    #[inline]
    pub fn build<I>(&self, args: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::Variant(self.call(args))
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor({})", self.tag)
    }
}

/// Create the constructor bound to `tag`.
///
/// Numbers are accepted and converted to text, so variants built by `make_constructor(1)` carry
/// the tag `"1"`.
#[inline]
pub fn make_constructor(tag: impl Into<Tag>) -> Constructor {
    Constructor::new(tag)
}
