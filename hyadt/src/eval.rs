//! Evaluator: tag dispatch and recursive tree reduction over a [`DispatchTable`].
//!
//! Role
//! - [`Evaluator::evaluate`] picks one of three modes from the runtime shape of its input:
//!   a string or number is a *selector* dispatched to the matching handler (or `_`), a variant
//!   is reduced bottom-up before its own tag is dispatched, and anything else is returned as is.
//! - [`Evaluator::member`] re-exposes every table entry as a callable [`Member`].
//!
//! Context
//! - Each handler invocation receives its own [`DispatchCtx`] holding the tag that selected it.
//!   Nested dispatch from inside a handler builds a fresh context and never alters the caller's.
//!   The evaluator therefore holds no mutable state and can be shared freely between threads.
//!
//! Recursion
//! - Reduction recurses on the call stack, one frame per nesting level of the input tree.
//!
//! Example
//! ```
//! use hyadt::{args, define, table::Handlers, value::Value};
//!
//! fn numbers(args: Vec<Value>) -> impl Iterator<Item = f64> {
//!     args.into_iter().filter_map(|arg| arg.try_as_num())
//! }
//!
//! let arith = define!(
//!     ["Add", "Mul"],
//!     Handlers::new()
//!         .on("Add", |_, args| Ok(Value::Num(numbers(args).sum())))
//!         .on("Mul", |_, args| Ok(Value::Num(numbers(args).product()))),
//! );
//! let mul = arith.construct("Mul", args![2, 3]);
//! assert!(mul.is_none()); // `Mul` was overridden by a computed handler
//!
//! let expr = hyadt::constructor::make_constructor("Add").call(args![
//!     hyadt::constructor::make_constructor("Mul").call(args![2, 3]),
//!     4,
//! ]);
//! assert_eq!(arith.evaluate(expr, vec![]), Ok(Value::Num(10.0)));
//! ```
use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::{
    constructor::Constructor,
    error::{EvalError, EvalResult},
    table::{Definition, DispatchTable, HandlerEntry, Handlers, KeySource},
    value::{Tag, Value, Variant},
};

/// Context handed to a handler for the duration of one invocation.
pub struct DispatchCtx<'e> {
    evaluator: &'e Evaluator,
    tag: Tag,
}

impl<'e> DispatchCtx<'e> {
    /// The tag that selected the running handler.
    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// The evaluator running the handler, for nested dispatch.
    #[inline]
    pub fn evaluator(&self) -> &'e Evaluator {
        self.evaluator
    }

    /// Shorthand for [`Evaluator::evaluate`] on the running evaluator.
    #[inline]
    pub fn evaluate(&self, value: impl Into<Value>, rest: Vec<Value>) -> EvalResult<Value> {
        self.evaluator.evaluate(value, rest)
    }

    /// Shorthand for [`Evaluator::call`] on the running evaluator.
    #[inline]
    pub fn call(&self, tag: &str, args: Vec<Value>) -> EvalResult<Value> {
        self.evaluator.call(tag, args)
    }

    /// Build an [`EvalError::Handler`] attributed to the running tag.
    #[inline]
    pub fn fail(&self, message: impl Into<String>) -> EvalError {
        EvalError::handler(&self.tag, message)
    }
}

impl fmt::Debug for DispatchCtx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchCtx").field("tag", &self.tag).finish()
    }
}

/// Callable view of one dispatch table entry.
#[derive(Clone, Copy)]
pub struct Member<'e> {
    evaluator: &'e Evaluator,
    tag: &'e Tag,
    entry: &'e HandlerEntry,
}

impl<'e> Member<'e> {
    #[inline]
    pub fn tag(&self) -> &'e Tag {
        self.tag
    }

    #[inline]
    pub fn entry(&self) -> &'e HandlerEntry {
        self.entry
    }

    /// Invoke the entry exactly as tag dispatch would.
    pub fn call(&self, args: Vec<Value>) -> EvalResult<Value> {
        let ctx = DispatchCtx {
            evaluator: self.evaluator,
            tag: self.tag.clone(),
        };
        self.entry.invoke(&ctx, args)
    }
}

impl fmt::Debug for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("tag", self.tag)
            .field("entry", self.entry)
            .finish()
    }
}

/// Dispatcher over an immutable dispatch table. Cloning is cheap (the table is shared).
#[derive(Debug, Clone)]
pub struct Evaluator {
    table: Arc<DispatchTable>,
}

impl Evaluator {
    pub fn new(table: DispatchTable) -> Self {
        Evaluator {
            table: Arc::new(table),
        }
    }

    #[inline]
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Evaluate `value`:
    /// - `Str`/`Num`: tag dispatch with `rest` as arguments (see [`dispatch`](Self::dispatch));
    /// - `Variant`: tree reduction (see [`reduce`](Self::reduce)), `rest` is ignored;
    /// - anything else is returned unchanged.
    pub fn evaluate(&self, value: impl Into<Value>, rest: Vec<Value>) -> EvalResult<Value> {
        match value.into() {
            Value::Str(selector) => self.dispatch(selector, rest),
            Value::Num(selector) => self.dispatch(selector, rest),
            Value::Variant(variant) => self.reduce(&variant),
            other => Ok(other),
        }
    }

    /// Invoke the handler registered for `selector`, or the default handler `_` when there is
    /// none. Fails with [`EvalError::NoHandler`] if neither exists.
    pub fn dispatch(&self, selector: impl Into<Tag>, args: Vec<Value>) -> EvalResult<Value> {
        let tag = selector.into();
        let Some(entry) = self.table.resolve(&tag) else {
            return Err(EvalError::NoHandler { tag });
        };
        trace!("Dispatching `{tag}` with {} argument(s)", args.len());
        let ctx = DispatchCtx {
            evaluator: self,
            tag,
        };
        entry.invoke(&ctx, args)
    }

    /// Post-order reduction: every variant field is reduced first (primitive fields pass
    /// through), then the variant's original tag is dispatched with the reduced fields.
    pub fn reduce(&self, variant: &Variant) -> EvalResult<Value> {
        let mut reduced = Vec::with_capacity(variant.arity());
        for field in variant.fields() {
            reduced.push(match field {
                Value::Variant(inner) => self.reduce(inner)?,
                other => other.clone(),
            });
        }
        self.dispatch(variant.tag(), reduced)
    }

    /// The callable member named `tag`, if the table has an entry for exactly that tag.
    pub fn member(&self, tag: &str) -> Option<Member<'_>> {
        self.table
            .get_key_value(tag)
            .map(|(tag, entry)| Member {
                evaluator: self,
                tag,
                entry,
            })
    }

    /// Every member, in tag order.
    pub fn members(&self) -> impl Iterator<Item = Member<'_>> {
        self.table.iter().map(move |(tag, entry)| Member {
            evaluator: self,
            tag,
            entry,
        })
    }

    /// Call the member named `tag`. Unlike [`dispatch`](Self::dispatch) this never falls back on
    /// the default handler: a missing member is [`EvalError::NoHandler`].
    pub fn call(&self, tag: &str, args: Vec<Value>) -> EvalResult<Value> {
        match self.member(tag) {
            Some(member) => member.call(args),
            None => Err(EvalError::NoHandler { tag: tag.into() }),
        }
    }

    /// The identity constructor installed under `tag`, if that entry is one.
    pub fn constructor(&self, tag: &str) -> Option<Constructor> {
        match self.table.get(tag)? {
            HandlerEntry::Construct(constructor) => Some(constructor.clone()),
            _ => None,
        }
    }

    /// Build a variant through the identity constructor installed under `tag`.
    pub fn construct<I>(&self, tag: &str, args: I) -> Option<Variant>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.constructor(tag).map(|constructor| constructor.call(args))
    }
}

impl KeySource for Evaluator {
    fn key_names(&self) -> Vec<Tag> {
        self.table.key_names()
    }
}

/// Build an evaluator from tag names, nested lists and handler objects.
///
/// See [`DispatchTable::build`] for the merge policy, and [`define!`](crate::define) for the
/// variadic form.
pub fn define<I>(definitions: I) -> Evaluator
where
    I: IntoIterator,
    I::Item: Into<Definition>,
{
    Evaluator::new(DispatchTable::build(definitions))
}

/// Identity constructors for every key name of `source`, inherited keys included.
pub fn constructors(source: &impl KeySource) -> Evaluator {
    define(source.key_names())
}

/// Evaluator made of the own (non-inherited) entries of each object; later objects override
/// earlier ones.
pub fn own(objects: &[&Handlers]) -> Evaluator {
    let mut merged = Handlers::new();
    for object in objects {
        for (tag, entry) in object.own_entries() {
            merged.insert(tag.clone(), entry.clone());
        }
    }
    define([merged])
}

/// Identity constructors for the own key names of each object.
pub fn own_constructors<S: KeySource>(objects: &[&S]) -> Evaluator {
    define(
        objects
            .iter()
            .flat_map(|object| object.own_key_names())
            .collect::<Vec<_>>(),
    )
}

/// Variadic spelling of [`define`]: each argument is anything convertible into a
/// [`Definition`].
#[macro_export]
macro_rules! define {
    ( $( $definition:expr ),* $(,)? ) => {{
        let definitions: ::std::vec::Vec<$crate::table::Definition> =
            ::std::vec![ $( $crate::table::Definition::from($definition) ),* ];
        $crate::eval::define(definitions)
    }};
}
