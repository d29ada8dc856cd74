//! Serializer: a specialized evaluator that encodes a variant tree to text.
//!
//! Role
//! - The serializer is an ordinary [`Evaluator`] whose table only has a default handler. Tree
//!   reduction visits the input inside-out, so every handler sees its sub-expressions already
//!   encoded and only has to concatenate.
//! - Each intermediate result is wrapped in a `serialized` marker variant so the parent can tell
//!   an encoded sub-expression (written in parentheses) from a plain string argument (written in
//!   quotes). The marker constructor is held by the handler and never installed in the table, so
//!   user data tagged `serialized` encodes like any other tag.
//!
//! Argument forms
//! - numbers: Rust's shortest round-trip formatting (`3.0` is written `3`);
//! - strings: double-quoted, see [`escape_string`](crate::escape::escape_string);
//! - sub-expressions: `(Tag args...)`;
//! - arrays: `[a,b,...]`, elements written with the same rules.
//!
//! Every tag must be an identifier ([`Tag::is_identifier`]); a tree holding any other tag is
//! rejected with [`SerializeError::InvalidTag`] instead of being written ambiguously.
//!
//! Example
//! ```
//! use hyadt::{args, constructor::make_constructor, serialize::serialize_variant};
//!
//! let point = make_constructor("Point").call(args![3, 4]);
//! assert_eq!(serialize_variant(&point).unwrap(), "Point 3 4");
//!
//! let line = make_constructor("Line").call(args![point.clone(), "label"]);
//! assert_eq!(serialize_variant(&line).unwrap(), "Line (Point 3 4) \"label\"");
//!
//! let spaced = make_constructor("My Tag").call(args![1]);
//! assert!(serialize_variant(&spaced).is_err());
//! ```
use std::{fmt, sync::LazyLock};

use crate::{
    constructor::Constructor,
    deserialize::parser::parse_number,
    error::{EvalError, EvalResult, SerializeError, SerializeResult},
    escape::escape_string,
    eval::{Evaluator, define},
    table::Handlers,
    value::{DEFAULT_TAG, Tag, Value, Variant},
};

const SERIALIZED_TAG: &str = "serialized";

static SERIALIZER: LazyLock<Evaluator> = LazyLock::new(serializer);

/// Build the serializing evaluator.
///
/// Every dispatch returns `serialized "<text>"`; [`serialize`] unwraps the final marker. A tag
/// that is not an identifier fails the dispatch with [`EvalError::Handler`].
pub fn serializer() -> Evaluator {
    let marker = Constructor::new(SERIALIZED_TAG);
    define([Handlers::new().on(DEFAULT_TAG, move |ctx, args| {
        let text = write_construction(ctx.tag(), &args)?;
        Ok(marker.build([Value::Str(text)]))
    })])
}

/// Text carried by a marker produced by the serializer.
fn serialized_text(variant: &Variant) -> Option<&str> {
    match variant.fields() {
        [Value::Str(text)] if variant.tag().as_str() == SERIALIZED_TAG => Some(text.as_str()),
        _ => None,
    }
}

/// `tag arg...` over already-reduced arguments.
fn write_construction(tag: &Tag, args: &[Value]) -> EvalResult<String> {
    if !tag.is_identifier() {
        return Err(EvalError::handler(tag, "tag is not an identifier"));
    }
    let mut text = tag.to_string();
    for arg in args {
        text.push(' ');
        write_arg(&mut text, arg)?;
    }
    Ok(text)
}

/// Write one already-reduced handler argument.
fn write_arg(out: &mut String, arg: &Value) -> EvalResult<()> {
    match arg {
        Value::Variant(variant) => match serialized_text(variant) {
            Some(text) => {
                out.push('(');
                out.push_str(text);
                out.push(')');
                Ok(())
            }
            None => write_element(out, arg),
        },
        other => write_element(out, other),
    }
}

/// Write a value that was not reduced (array elements, top-level primitives).
fn write_element(out: &mut String, value: &Value) -> EvalResult<()> {
    match value {
        Value::Str(s) => {
            out.push('"');
            out.push_str(&escape_string(s));
            out.push('"');
        }
        Value::Num(n) => out.push_str(&n.to_string()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_element(out, item)?;
            }
            out.push(']');
        }
        Value::Variant(variant) => {
            out.push('(');
            out.push_str(&encode(variant)?);
            out.push(')');
        }
    }
    Ok(())
}

fn encode(variant: &Variant) -> EvalResult<String> {
    let reduced = SERIALIZER.reduce(variant)?;
    match reduced.try_as_variant_ref().and_then(serialized_text) {
        Some(text) => Ok(text.to_owned()),
        None => Err(EvalError::handler(variant.tag(), "serializer returned no text")),
    }
}

/// Reject the first tag of the tree that is not an identifier, depth-first.
fn check_tags(value: &Value) -> SerializeResult<()> {
    match value {
        Value::Variant(variant) => check_variant(variant),
        Value::Array(items) => items.iter().try_for_each(check_tags),
        Value::Str(_) | Value::Num(_) => Ok(()),
    }
}

fn check_variant(variant: &Variant) -> SerializeResult<()> {
    if !variant.tag().is_identifier() {
        return Err(SerializeError::InvalidTag {
            tag: variant.tag().clone(),
        });
    }
    variant.fields().iter().try_for_each(check_tags)
}

/// Encode a variant tree, e.g. `Point 3 4` or `Cons 1 (Nil)`.
///
/// A nullary variant whose tag reads as a number is parenthesized (`(3)`), since a lone `3`
/// decodes as a number.
pub fn serialize_variant(variant: &Variant) -> SerializeResult<String> {
    check_variant(variant)?;
    let text = encode(variant)?;
    if variant.arity() == 0 && parse_number(variant.tag()).is_some() {
        Ok(format!("({text})"))
    } else {
        Ok(text)
    }
}

/// Encode any value. Variants use [`serialize_variant`]; a top-level primitive is written in its
/// argument form (quoted string, number, bracketed array) so that it decodes back to itself.
pub fn serialize(value: &Value) -> SerializeResult<String> {
    match value {
        Value::Variant(variant) => serialize_variant(variant),
        other => {
            check_tags(other)?;
            let mut out = String::new();
            write_element(&mut out, other)?;
            Ok(out)
        }
    }
}

/// Formatting fails with [`fmt::Error`] when the tree cannot be serialized.
impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serialize_variant(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Formatting fails with [`fmt::Error`] when the tree cannot be serialized.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serialize(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
