//! Tokenizer: splits encoded text into lexemes with chumsky.
//!
//! - Space, tab, CR and LF separate lexemes and are otherwise dropped.
//! - `(`, `)`, `[`, `]` and `,` are one-character lexemes.
//! - `"` and `'` start a quoted lexeme that runs to the next matching quote not preceded by an
//!   escaping backslash; the raw body (escapes still in place) is kept.
//! - Anything else runs to the next delimiter or whitespace and forms a bare lexeme.
//!
//! The lexer itself never fails on a missing closing quote: it marks the lexeme as
//! unterminated, and [`tokenize`] turns the first such lexeme into a [`LexError`].
use std::fmt;

use chumsky::prelude::*;

use crate::error::LexError;

pub type Spanned<T> = (T, SimpleSpan);

const WHITESPACE: &str = " \t\r\n";
pub(crate) const DELIMITERS: &str = "()[],\"' \t\r\n";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lexeme<'src> {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    /// A quoted literal. `body` excludes the quotes and still carries its escapes.
    Quoted {
        quote: char,
        body: &'src str,
        terminated: bool,
    },

    /// A run of non-delimiter characters: a tag, a number or a nullary construction.
    Bare(&'src str),
}

impl fmt::Display for Lexeme<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lexeme::LParen => write!(f, "("),
            Lexeme::RParen => write!(f, ")"),
            Lexeme::LBracket => write!(f, "["),
            Lexeme::RBracket => write!(f, "]"),
            Lexeme::Comma => write!(f, ","),
            Lexeme::Quoted {
                quote,
                body,
                terminated: true,
            } => write!(f, "{quote}{body}{quote}"),
            Lexeme::Quoted { quote, body, .. } => write!(f, "{quote}{body}"),
            Lexeme::Bare(text) => write!(f, "{text}"),
        }
    }
}

fn quoted<'src>(
    quote: char,
    stops: &'src str,
) -> impl Parser<'src, &'src str, Lexeme<'src>, extra::Err<Rich<'src, char>>> + Clone {
    let escaped = just('\\').then(any()).ignored();
    let unescaped = none_of(stops).ignored();

    just(quote)
        .ignore_then(escaped.or(unescaped).repeated().to_slice())
        .then(just(quote).or_not())
        .map(move |(body, closing)| Lexeme::Quoted {
            quote,
            body,
            terminated: closing.is_some(),
        })
}

fn lexer<'src>()
-> impl Parser<'src, &'src str, Vec<Spanned<Lexeme<'src>>>, extra::Err<Rich<'src, char>>> {
    let punct = choice((
        just('(').to(Lexeme::LParen),
        just(')').to(Lexeme::RParen),
        just('[').to(Lexeme::LBracket),
        just(']').to(Lexeme::RBracket),
        just(',').to(Lexeme::Comma),
    ));

    let bare = none_of(DELIMITERS)
        .repeated()
        .at_least(1)
        .to_slice()
        .map(Lexeme::Bare);

    let token = choice((quoted('"', "\"\\"), quoted('\'', "'\\"), punct, bare));

    let whitespace = one_of(WHITESPACE).repeated();

    whitespace
        .clone()
        .ignore_then(
            token
                .map_with(|tok, e| (tok, e.span()))
                .then_ignore(whitespace)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
}

/// Split `src` into spanned lexemes.
///
/// Fails with [`LexError::UnterminatedString`] on the first quoted literal without a closing
/// quote. Spans are byte offsets into `src`.
pub fn tokenize(src: &str) -> Result<Vec<Spanned<Lexeme<'_>>>, LexError> {
    let lexemes = lexer()
        .parse(src)
        .into_result()
        .map_err(|errors| LexError::Malformed {
            message: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        })?;

    let unterminated = lexemes.iter().find(|(lexeme, _)| {
        matches!(
            lexeme,
            Lexeme::Quoted {
                terminated: false,
                ..
            }
        )
    });
    if let Some((_, span)) = unterminated {
        return Err(LexError::UnterminatedString {
            offset: span.start,
            preview: src[span.start..].chars().take(5).collect(),
        });
    }

    Ok(lexemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexemes(src: &str) -> Vec<Lexeme<'_>> {
        tokenize(src)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|(lexeme, _)| lexeme)
            .collect()
    }

    #[test]
    fn splits_on_whitespace_and_delimiters() {
        assert_eq!(
            lexemes(" Point\t3\r\n(Inner [1,2]) "),
            vec![
                Lexeme::Bare("Point"),
                Lexeme::Bare("3"),
                Lexeme::LParen,
                Lexeme::Bare("Inner"),
                Lexeme::LBracket,
                Lexeme::Bare("1"),
                Lexeme::Comma,
                Lexeme::Bare("2"),
                Lexeme::RBracket,
                Lexeme::RParen,
            ]
        );
    }

    #[test]
    fn empty_and_blank_inputs_have_no_lexemes() {
        assert!(lexemes("").is_empty());
        assert!(lexemes(" \t\r\n ").is_empty());
    }

    #[test]
    fn quoted_literals_keep_escapes_and_stop_at_unescaped_quote() {
        assert_eq!(
            lexemes(r#"Say "a \"b\" c" 'it\'s'"#),
            vec![
                Lexeme::Bare("Say"),
                Lexeme::Quoted {
                    quote: '"',
                    body: r#"a \"b\" c"#,
                    terminated: true,
                },
                Lexeme::Quoted {
                    quote: '\'',
                    body: r"it\'s",
                    terminated: true,
                },
            ]
        );
    }

    #[test]
    fn escaped_backslash_before_closing_quote() {
        assert_eq!(
            lexemes(r#""dir\\" x"#),
            vec![
                Lexeme::Quoted {
                    quote: '"',
                    body: r"dir\\",
                    terminated: true,
                },
                Lexeme::Bare("x"),
            ]
        );
    }

    #[test]
    fn other_quote_kind_does_not_close_a_literal() {
        assert_eq!(
            lexemes(r#""it's""#),
            vec![Lexeme::Quoted {
                quote: '"',
                body: "it's",
                terminated: true,
            }]
        );
    }

    #[test]
    fn quotes_end_bare_lexemes() {
        assert_eq!(
            lexemes(r#"abc"d""#),
            vec![
                Lexeme::Bare("abc"),
                Lexeme::Quoted {
                    quote: '"',
                    body: "d",
                    terminated: true,
                },
            ]
        );
    }

    #[test]
    fn spans_are_byte_offsets() {
        let tokens = tokenize("  (é x)").expect("tokenize should succeed");
        let starts: Vec<usize> = tokens.iter().map(|(_, span)| span.start).collect();
        assert_eq!(starts, vec![2, 3, 6, 7]);
    }

    #[test]
    fn unterminated_string_is_reported() {
        let err = tokenize(r#"Name "abcdefgh"#).unwrap_err();
        assert_eq!(
            err,
            LexError::UnterminatedString {
                offset: 5,
                preview: "\"abcd".to_string(),
            }
        );

        // the closing quote is escaped
        assert!(tokenize(r#""abc\""#).unwrap_err().is_unterminated_string());
    }
}
