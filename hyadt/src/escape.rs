//! Escaping of string literals in the textual encoding.
//!
//! | character | escaped |
//! |-----------|---------|
//! | `\`       | `\\`    |
//! | `"`       | `\"`    |
//! | `'`       | `\'`    |
//! | tab       | `\t`    |
//! | CR        | `\r`    |
//! | LF        | `\n`    |
//!
//! Every other character is written unchanged.

/// Escape `input` so that it can be placed between quotes.
pub fn escape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Inverse of [`escape_string`], scanning left to right and consuming each escape pair as one
/// unit. An unknown escape `\x` yields `x`; a lone trailing backslash is kept as is.
pub fn unescape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_every_special_character() {
        assert_eq!(
            escape_string("a\\b\"c'd\te\rf\ng"),
            "a\\\\b\\\"c\\'d\\te\\rf\\ng"
        );
        assert_eq!(escape_string("plain text"), "plain text");
        assert_eq!(escape_string(""), "");
    }

    #[test]
    fn unescape_inverts_escape() {
        let samples = [
            "",
            "\\",
            "\\\\",
            "\"quoted\"",
            "it's",
            "tab\there",
            "line\r\nbreak",
            "trailing backslash \\",
            "\\n is not a newline",
            "unicode: é ü ∀",
        ];
        for s in samples {
            assert_eq!(unescape_string(&escape_string(s)), s, "sample {s:?}");
        }
    }

    #[test]
    fn unescape_consumes_pairs_as_units() {
        // `\\n` is an escaped backslash followed by `n`, not a newline
        assert_eq!(unescape_string("\\\\n"), "\\n");
        assert_eq!(unescape_string("\\q"), "q");
        assert_eq!(unescape_string("end\\"), "end\\");
    }
}
