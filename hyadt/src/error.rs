use strum::EnumIs;
use thiserror::Error;

use crate::value::Tag;

/// Failure raised while dispatching a tag.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum EvalError {
    /// The selected tag has no handler and the table carries no default (`_`) handler.
    #[error("No handler for tag `{tag}` and no default handler `_` in the dispatch table.")]
    NoHandler { tag: Tag },

    /// A handler rejected its arguments.
    #[error("Handler for tag `{tag}` failed: {message}")]
    Handler { tag: Tag, message: String },
}

impl EvalError {
    /// Convenience for handlers reporting their own failure.
    pub fn handler(tag: &Tag, message: impl Into<String>) -> Self {
        EvalError::Handler {
            tag: tag.clone(),
            message: message.into(),
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Tokenizer failure.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum LexError {
    /// A quoted literal has no matching, non-escaped closing quote.
    #[error(
        "No closing quotation mark was found for the string starting with `{preview}...` at offset {offset}."
    )]
    UnterminatedString { offset: usize, preview: String },

    /// The input could not be split into lexemes.
    #[error("Malformed input: {message}")]
    Malformed { message: String },
}

/// Parser failure.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum ParseError {
    /// A lexeme was found where a tag, a value or a closing delimiter was expected.
    #[error("Unexpected token `{token}` at offset {offset}.")]
    UnexpectedToken { token: String, offset: usize },

    /// An opening `(` or `[` was never closed.
    #[error("No closing delimiter found for the `{delimiter}` opened at offset {offset}.")]
    Unmatched { delimiter: char, offset: usize },

    /// Nesting exceeded [`DeserializeOptions::max_depth`](crate::deserialize::DeserializeOptions::max_depth).
    #[error("Nesting deeper than the configured limit of {limit} at offset {offset}.")]
    TooDeep { limit: usize, offset: usize },
}

/// Any failure of [`deserialize`](crate::deserialize::deserialize).
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum DeserializeError {
    #[error("lexing error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

pub type DeserializeResult<T> = Result<T, DeserializeError>;

/// Failure of [`serialize`](crate::serialize::serialize).
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum SerializeError {
    /// A tag that would not read back as a single bare lexeme.
    #[error("Tag `{tag}` cannot be serialized: tags must be non-empty and free of whitespace and delimiters.")]
    InvalidTag { tag: Tag },

    /// The serializing evaluator failed.
    #[error("serializer error: {0}")]
    Eval(#[from] EvalError),
}

pub type SerializeResult<T> = Result<T, SerializeError>;
