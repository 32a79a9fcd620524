use std::fmt;

/// How much of the remaining input to echo back in a mismatch diagnostic.
pub(crate) const SNIPPET_LEN: usize = 14;

/// The first `SNIPPET_LEN` characters of the remaining input, for use in
/// error messages. Counted in chars so a multi-byte character at the
/// boundary can't be split.
pub(crate) fn snippet(remaining: &str) -> String {
    remaining.chars().take(SNIPPET_LEN).collect()
}

/*========================================*/
/*          Parse Error                   */
/*========================================*/

/// An error encountered while parsing.
///
/// Failure is always a value carried in the [`ParseState`](crate::ParseState),
/// never an exception: the recovering combinators (`choice`, `many0`, ...)
/// inspect it and revert to an earlier state, and everything else forwards it
/// unchanged. Every variant records the byte offset at which it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A primitive attempted a match but the remaining input was empty.
    UnexpectedEndOfInput { expected: String, offset: usize },
    /// A literal matcher found differing content. `found` is a short snippet
    /// of the remaining input.
    LiteralMismatch {
        expected: String,
        found: String,
        offset: usize,
    },
    /// A character-class or regex matcher found no qualifying prefix.
    PatternNotMatched { pattern: String, offset: usize },
    /// Every branch of a `choice` failed.
    NoAlternativeMatched { offset: usize },
    /// A one-or-more combinator (`many1`, `many_sep1`) collected nothing.
    MinimumNotMet {
        combinator: &'static str,
        offset: usize,
    },
    /// A grammar-specific diagnostic, from `try_map` or `map_err`.
    Custom { message: String, offset: usize },
}

impl ParseError {
    /// Build a grammar-specific error at `offset`.
    pub fn custom(message: impl Into<String>, offset: usize) -> ParseError {
        ParseError::Custom {
            message: message.into(),
            offset,
        }
    }

    /// The byte offset at which the error occurred.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnexpectedEndOfInput { offset, .. } => *offset,
            ParseError::LiteralMismatch { offset, .. } => *offset,
            ParseError::PatternNotMatched { offset, .. } => *offset,
            ParseError::NoAlternativeMatched { offset } => *offset,
            ParseError::MinimumNotMet { offset, .. } => *offset,
            ParseError::Custom { offset, .. } => *offset,
        }
    }

    fn message(&self) -> String {
        match self {
            ParseError::UnexpectedEndOfInput { expected, .. } => {
                format!("expected {} but reached end of input", expected)
            }
            ParseError::LiteralMismatch {
                expected, found, ..
            } => {
                format!("expected '{}' but found '{}'", expected, found)
            }
            ParseError::PatternNotMatched { pattern, .. } => {
                format!("expected {}", pattern)
            }
            ParseError::NoAlternativeMatched { .. } => "no alternative matched".to_owned(),
            ParseError::MinimumNotMet { combinator, .. } => {
                format!("{} matched nothing", combinator)
            }
            ParseError::Custom { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use colored::Colorize;

        write!(
            f,
            "{}{} {} {}",
            "parse error".red().bold(),
            ":".bold(),
            self.message(),
            format!("(at offset {})", self.offset()).blue().bold(),
        )
    }
}

impl std::error::Error for ParseError {}
