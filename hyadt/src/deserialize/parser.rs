//! Stack-based parser turning lexemes into a value tree.
//!
//! Nesting is tracked with an explicit frame stack instead of recursion, so deeply nested input
//! cannot overflow the call stack. [`DeserializeOptions::max_depth`] optionally bounds the stack.
//!
//! When the first lexeme is neither `(`, `[` nor a quoted literal, the input is read as if it
//! were wrapped in one pair of parentheses: `Point 3 4` parses like `(Point 3 4)`. The one
//! exception is an input made of a single number, which is read as that number.
use crate::{
    deserialize::{
        DeserializeOptions, NumberLiterals,
        lexer::{Lexeme, Spanned},
    },
    error::ParseError,
    escape::unescape_string,
    value::{Tag, Value, Variant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// Right after `[`: an element or `]`.
    Open,
    /// After an element: `,` or `]`.
    AfterItem,
    /// After `,`: an element.
    AfterComma,
}

#[derive(Debug)]
enum Frame {
    Construction {
        open: usize,
        tag: Option<Tag>,
        fields: Vec<Value>,
    },
    Array {
        open: usize,
        items: Vec<Value>,
        state: ArrayState,
    },
}

impl Frame {
    fn unmatched(&self) -> ParseError {
        match self {
            Frame::Construction { open, .. } => ParseError::Unmatched {
                delimiter: '(',
                offset: *open,
            },
            Frame::Array { open, .. } => ParseError::Unmatched {
                delimiter: '[',
                offset: *open,
            },
        }
    }
}

fn unexpected(lexeme: &Lexeme<'_>, offset: usize) -> ParseError {
    ParseError::UnexpectedToken {
        token: lexeme.to_string(),
        offset,
    }
}

/// Reads a bare lexeme as a number when it starts like one: a digit, or a sign or `.` directly
/// followed by a digit (or by `.`). Text that starts like a number but does not parse stays text.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let mut chars = text.chars();
    let numeric = match chars.next()? {
        c if c.is_ascii_digit() => true,
        '+' | '-' | '.' => chars.next().is_some_and(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    };
    if numeric { text.parse().ok() } else { None }
}

struct StackParser<'o> {
    options: &'o DeserializeOptions,
    stack: Vec<Frame>,
    done: Option<Value>,
}

impl<'o> StackParser<'o> {
    fn new(options: &'o DeserializeOptions) -> Self {
        StackParser {
            options,
            stack: Vec::new(),
            done: None,
        }
    }

    /// Whether a value (or an opening delimiter) may appear at this point.
    fn expect_value(&self, lexeme: &Lexeme<'_>, offset: usize) -> Result<(), ParseError> {
        let accepted = match self.stack.last() {
            None => self.done.is_none(),
            Some(Frame::Construction { tag, .. }) => tag.is_some(),
            Some(Frame::Array { state, .. }) => *state != ArrayState::AfterItem,
        };
        if accepted {
            Ok(())
        } else {
            Err(unexpected(lexeme, offset))
        }
    }

    fn push(&mut self, frame: Frame, offset: usize) -> Result<(), ParseError> {
        if let Some(limit) = self.options.max_depth {
            if self.stack.len() >= limit {
                return Err(ParseError::TooDeep { limit, offset });
            }
        }
        self.stack.push(frame);
        Ok(())
    }

    /// Hand a finished value to the enclosing frame, or keep it as the result.
    fn emit(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.done = Some(value),
            Some(Frame::Construction { fields, .. }) => fields.push(value),
            Some(Frame::Array { items, state, .. }) => {
                items.push(value);
                *state = ArrayState::AfterItem;
            }
        }
    }

    fn literal(&self, text: &str) -> Value {
        match (parse_number(text), self.options.numbers) {
            (Some(number), NumberLiterals::Numeric) => Value::Num(number),
            (Some(_), NumberLiterals::Text) => Value::Str(text.to_owned()),
            (None, _) => Value::Variant(Variant::nullary(text)),
        }
    }

    fn feed(&mut self, lexeme: &Lexeme<'_>, offset: usize) -> Result<(), ParseError> {
        match lexeme {
            Lexeme::LParen => {
                self.expect_value(lexeme, offset)?;
                self.push(
                    Frame::Construction {
                        open: offset,
                        tag: None,
                        fields: Vec::new(),
                    },
                    offset,
                )
            }
            Lexeme::LBracket => {
                self.expect_value(lexeme, offset)?;
                self.push(
                    Frame::Array {
                        open: offset,
                        items: Vec::new(),
                        state: ArrayState::Open,
                    },
                    offset,
                )
            }
            Lexeme::RParen => match self.stack.pop() {
                Some(Frame::Construction {
                    tag: Some(tag),
                    fields,
                    ..
                }) => {
                    self.emit(Value::Variant(Variant::new(tag, fields)));
                    Ok(())
                }
                _ => Err(unexpected(lexeme, offset)),
            },
            Lexeme::RBracket => match self.stack.pop() {
                Some(Frame::Array {
                    items,
                    state: ArrayState::Open | ArrayState::AfterItem,
                    ..
                }) => {
                    self.emit(Value::Array(items));
                    Ok(())
                }
                _ => Err(unexpected(lexeme, offset)),
            },
            Lexeme::Comma => match self.stack.last_mut() {
                Some(Frame::Array { state, .. }) if *state == ArrayState::AfterItem => {
                    *state = ArrayState::AfterComma;
                    Ok(())
                }
                _ => Err(unexpected(lexeme, offset)),
            },
            Lexeme::Quoted { body, .. } => {
                self.expect_value(lexeme, offset)?;
                self.emit(Value::Str(unescape_string(body)));
                Ok(())
            }
            Lexeme::Bare(text) => {
                if let Some(Frame::Construction { tag: tag @ None, .. }) = self.stack.last_mut() {
                    *tag = Some(Tag::new(text));
                    return Ok(());
                }
                self.expect_value(lexeme, offset)?;
                let value = self.literal(text);
                self.emit(value);
                Ok(())
            }
        }
    }

    fn finish(self) -> Result<Option<Value>, ParseError> {
        match self.stack.last() {
            Some(frame) => Err(frame.unmatched()),
            None => Ok(self.done),
        }
    }
}

/// Parse a full lexeme stream. No lexemes yields `Ok(None)`.
pub fn parse(
    lexemes: &[Spanned<Lexeme<'_>>],
    options: &DeserializeOptions,
) -> Result<Option<Value>, ParseError> {
    let (Some((first, start)), Some((_, last))) = (lexemes.first(), lexemes.last()) else {
        return Ok(None);
    };

    // a lone number is read as a number, not as a nullary construction
    if let [(Lexeme::Bare(text), _)] = lexemes {
        if parse_number(text).is_some() {
            return Ok(Some(StackParser::new(options).literal(text)));
        }
    }

    let implicit = !matches!(
        first,
        Lexeme::LParen | Lexeme::LBracket | Lexeme::Quoted { .. }
    );

    let mut parser = StackParser::new(options);
    if implicit {
        parser.feed(&Lexeme::LParen, start.start)?;
    }
    for (lexeme, span) in lexemes {
        // only the synthetic close may end the implicit frame
        if implicit && parser.stack.len() == 1 && matches!(lexeme, Lexeme::RParen) {
            return Err(unexpected(lexeme, span.start));
        }
        parser.feed(lexeme, span.start)?;
    }
    if implicit {
        // the implicit frame can only be closed once everything inside it is
        if parser.stack.len() > 1 {
            if let Some(frame) = parser.stack.last() {
                return Err(frame.unmatched());
            }
        }
        parser.feed(&Lexeme::RParen, last.end)?;
    }

    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_detection() {
        assert_eq!(parse_number("3"), Some(3.0));
        assert_eq!(parse_number("-2.5"), Some(-2.5));
        assert_eq!(parse_number("+7"), Some(7.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("3abc"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("-x"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("Point"), None);
        assert_eq!(parse_number(""), None);
    }
}
