//! Deserializer: text back to a value tree.
//!
//! Role
//! - [`lexer`] splits the text into lexemes, [`parser`] folds them into a [`Value`].
//! - Inside a construction the first bare lexeme is the tag. Every later bare lexeme is a number
//!   when it reads as one, and a nullary construction otherwise. Quoted lexemes are strings.
//!
//! Example
//! ```
//! use hyadt::{deserialize::deserialize, value::Value};
//!
//! let value = deserialize("Point 3 (Label \"a\")").unwrap().unwrap();
//! let point = value.try_as_variant_ref().unwrap();
//! assert_eq!(point.tag().as_str(), "Point");
//! assert_eq!(point.field(0), Some(&Value::Num(3.0)));
//! assert_eq!(point.to_string(), "Point 3 (Label \"a\")");
//!
//! assert_eq!(deserialize("   ").unwrap(), None);
//! ```
pub mod lexer;
pub mod parser;

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{DeserializeError, DeserializeResult},
    value::Value,
};

/// How bare lexemes that read as numbers are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NumberLiterals {
    /// As [`Value::Num`].
    #[default]
    Numeric,
    /// As [`Value::Str`] holding the literal text.
    Text,
}

/// Knobs for [`deserialize_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DeserializeOptions {
    pub numbers: NumberLiterals,

    /// Maximum number of simultaneously open `(`/`[` (the implicit parentheses around an
    /// unbracketed input count as one). `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl DeserializeOptions {
    #[inline]
    pub fn with_numbers(mut self, numbers: NumberLiterals) -> Self {
        self.numbers = numbers;
        self
    }

    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Decode `text` with the default options. Empty or blank text decodes to `None`.
pub fn deserialize(text: &str) -> DeserializeResult<Option<Value>> {
    deserialize_with(text, &DeserializeOptions::default())
}

/// Decode `text` with explicit options.
pub fn deserialize_with(
    text: &str,
    options: &DeserializeOptions,
) -> DeserializeResult<Option<Value>> {
    let result = lexer::tokenize(text)
        .map_err(DeserializeError::from)
        .and_then(|lexemes| parser::parse(&lexemes, options).map_err(DeserializeError::from));

    if let Err(err) = &result {
        debug!("Failed to deserialize {} byte(s) of input: {err}", text.len());
    }
    result
}
