//! Leaf parsers: exact literal match, greedy ASCII character-class matching,
//! and anchored regex matching.
//!
//! Every primitive is anchored at the current offset: it either succeeds and
//! advances the offset by exactly what it matched, or fails without moving.
//! An empty remaining input always fails with the end-of-input diagnostic,
//! distinct from a mismatch.

use crate::parse_error::{snippet, ParseError};
use crate::state::ParseState;
use crate::Parser;
use regex::{Error as RegexError, Regex};

/*========================================*/
/*          Literal match                 */
/*========================================*/

#[derive(Debug, Clone)]
struct StringP {
    expected: String,
}

impl Parser<String> for StringP {
    fn apply(&self, state: ParseState<()>) -> ParseState<String> {
        if state.is_err() {
            return state.recast();
        }
        let remaining = state.remaining();
        if remaining.is_empty() {
            let error = ParseError::UnexpectedEndOfInput {
                expected: format!("'{}'", self.expected),
                offset: state.offset,
            };
            return ParseState::fail(state.input, state.offset, error);
        }
        if remaining.starts_with(&self.expected) {
            let offset = state.offset + self.expected.len();
            ParseState::ok(state.input, offset, self.expected.clone())
        } else {
            let error = ParseError::LiteralMismatch {
                expected: self.expected.clone(),
                found: snippet(remaining),
                offset: state.offset,
            };
            ParseState::fail(state.input, state.offset, error)
        }
    }
}

/// A parser that matches `expected` exactly and produces it as its value.
pub fn string(expected: &str) -> impl Parser<String> + Clone {
    StringP {
        expected: expected.to_owned(),
    }
}

/*========================================*/
/*          Character classes             */
/*========================================*/

#[derive(Debug, Clone, Copy)]
enum CharClass {
    Letters,
    Digits,
    Alphanumerics,
}

impl CharClass {
    fn accepts(self, ch: char) -> bool {
        match self {
            CharClass::Letters => ch.is_ascii_alphabetic(),
            CharClass::Digits => ch.is_ascii_digit(),
            CharClass::Alphanumerics => ch.is_ascii_alphanumeric(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            CharClass::Letters => "letters",
            CharClass::Digits => "digits",
            CharClass::Alphanumerics => "letters or digits",
        }
    }
}

#[derive(Debug, Clone)]
struct ClassP(CharClass);

impl Parser<String> for ClassP {
    fn apply(&self, state: ParseState<()>) -> ParseState<String> {
        if state.is_err() {
            return state.recast();
        }
        let remaining = state.remaining();
        if remaining.is_empty() {
            let error = ParseError::UnexpectedEndOfInput {
                expected: self.0.name().to_owned(),
                offset: state.offset,
            };
            return ParseState::fail(state.input, state.offset, error);
        }
        // Greedy longest-prefix scan. ASCII classes, so byte length
        // equals what we scanned.
        let len = remaining
            .find(|ch: char| !self.0.accepts(ch))
            .unwrap_or(remaining.len());
        if len == 0 {
            let error = ParseError::PatternNotMatched {
                pattern: self.0.name().to_owned(),
                offset: state.offset,
            };
            ParseState::fail(state.input, state.offset, error)
        } else {
            let matched = remaining[..len].to_owned();
            let offset = state.offset + len;
            ParseState::ok(state.input, offset, matched)
        }
    }
}

/// Matches one or more ASCII letters (`[A-Za-z]+`), greedily.
pub fn letters() -> impl Parser<String> + Clone {
    ClassP(CharClass::Letters)
}

/// Matches one or more ASCII digits (`[0-9]+`), greedily.
pub fn digits() -> impl Parser<String> + Clone {
    ClassP(CharClass::Digits)
}

/// Matches one or more ASCII letters or digits (`[A-Za-z0-9]+`), greedily.
pub fn alphanumerics() -> impl Parser<String> + Clone {
    ClassP(CharClass::Alphanumerics)
}

/*========================================*/
/*          Regex match                   */
/*========================================*/

/// Compile `pattern` wrapped in `^(...)` so matching is anchored at the
/// current offset. If the wrapped form is rejected, recompile the bare
/// pattern to report an error that quotes what the caller actually wrote.
fn anchored_regex(pattern: &str) -> Result<Regex, RegexError> {
    let anchored = format!("^({})", pattern);
    Regex::new(&anchored).map_err(|wrapped_err| match Regex::new(pattern) {
        Err(bare_err) => bare_err,
        Ok(_) => wrapped_err,
    })
}

#[derive(Debug, Clone)]
struct RegexP {
    name: String,
    regex: Regex,
}

impl Parser<String> for RegexP {
    fn apply(&self, state: ParseState<()>) -> ParseState<String> {
        if state.is_err() {
            return state.recast();
        }
        let remaining = state.remaining();
        if remaining.is_empty() {
            let error = ParseError::UnexpectedEndOfInput {
                expected: self.name.clone(),
                offset: state.offset,
            };
            return ParseState::fail(state.input, state.offset, error);
        }
        match self.regex.find(remaining) {
            Some(found) => {
                let matched = found.as_str().to_owned();
                let offset = state.offset + found.end();
                ParseState::ok(state.input, offset, matched)
            }
            None => {
                let error = ParseError::PatternNotMatched {
                    pattern: self.name.clone(),
                    offset: state.offset,
                };
                ParseState::fail(state.input, state.offset, error)
            }
        }
    }
}

/// A parser that matches `pattern` anchored at the current offset and
/// produces the matched substring. `name` is used in error messages.
///
/// The regex syntax is that of the
/// [regex](https://docs.rs/regex/latest/regex/) crate. You do not need to
/// begin the pattern with a start-of-string character `^`.
pub fn regex(name: &str, pattern: &str) -> Result<impl Parser<String> + Clone, RegexError> {
    Ok(RegexP {
        name: name.to_owned(),
        regex: anchored_regex(pattern)?,
    })
}
