//! Hyadt: algebraic data types as tagged values, tag dispatch over them, and a reversible
//! s-expression-like text encoding.
//!
//! Layout
//!  - [`value`]: the variant value model (`Tag`, `Value`, `Variant`) and `deconstruct`.
//!  - [`constructor`]: constructors stamping out variants of one tag.
//!  - [`table`]: handler objects and the dispatch table builder.
//!  - [`eval`]: the evaluator (tag dispatch, tree reduction, callable members).
//!  - [`serialize`] / [`deserialize`]: the text encoding, with [`escape`] for string literals.
//!  - [`adt`]: typed, closed sum types declared with [`adt!`].
//!
//! Encoding
//!  - `Point 3 4` is a construction with tag `Point` and two numeric fields. Nested constructions
//!    are parenthesized, strings are double-quoted, arrays are written `[a,b]`.
//!  - `deserialize(serialize(v)) == v` for any variant built from strings, finite numbers, arrays
//!    and nested variants.
//!
//! Example
//! ```
//! use hyadt::prelude::*;
//!
//! let eval = define!(
//!     "Point",
//!     Handlers::new().on("Norm", |ctx, args| {
//!         let [Value::Variant(point)] = args.as_slice() else {
//!             return Err(ctx.fail("expected a single point"));
//!         };
//!         let squares = point.fields().iter().filter_map(|field| match field {
//!             Value::Num(n) => Some(n * n),
//!             _ => None,
//!         });
//!         Ok(Value::Num(squares.sum::<f64>().sqrt()))
//!     }),
//! );
//!
//! let point = eval.construct("Point", args![3, 4]).unwrap();
//! assert_eq!(point.to_string(), "Point 3 4");
//!
//! let parsed = deserialize("Norm (Point 3 4)").unwrap().unwrap();
//! assert_eq!(eval.evaluate(parsed, vec![]), Ok(Value::Num(5.0)));
//! ```

/// Typed algebraic data types and the `adt!` declaration macro.
pub mod adt;
/// Constructor factory.
pub mod constructor;
/// Text to value tree: tokenizer and stack parser.
pub mod deserialize;
/// Error types of every fallible operation.
pub mod error;
/// String literal escaping.
pub mod escape;
/// Evaluator and the derived-evaluator helpers.
pub mod eval;
/// Value tree to text.
pub mod serialize;
/// Handler objects and dispatch tables.
pub mod table;
/// Variant value model.
pub mod value;

pub use eval::{constructors, define, own, own_constructors};

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - Value model and constructors
    //! - Dispatch table builder and evaluator
    //! - Text encoding entry points
    //! - The `args!`, `define!` and `adt!` macros
    pub use crate::adt::{Adt, FromValue};
    pub use crate::constructor::{Constructor, make_constructor};
    pub use crate::deserialize::{DeserializeOptions, NumberLiterals, deserialize, deserialize_with};
    pub use crate::error::{
        DeserializeError, EvalError, EvalResult, LexError, ParseError, SerializeError,
    };
    pub use crate::eval::{DispatchCtx, Evaluator, Member, constructors, own, own_constructors};
    pub use crate::serialize::{serialize, serialize_variant};
    pub use crate::table::{Definition, DispatchTable, HandlerEntry, Handlers, KeySource};
    pub use crate::value::{Tag, Value, Variant, deconstruct};

    pub use crate::{adt, args, define};
}
