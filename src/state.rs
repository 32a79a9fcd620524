//! The immutable snapshot threaded through every parsing step.
//!
//! A state is never mutated in place: each step constructs a new one. The
//! input text is held behind an `Rc` so that the recovering combinators
//! (`choice`, `many0`, ...) can cheaply snapshot a position and retry from it.

use crate::parse_error::ParseError;
use std::rc::Rc;

/*========================================*/
/*          Parse State                   */
/*========================================*/

/// A snapshot of parsing progress: the full input, a byte-offset cursor into
/// it, and either the most recently produced value or a sticky error.
///
/// The initial state (before anything has matched) is `ParseState<()>` with
/// the unit value. Once a state carries an error, every parser applied to it
/// forwards it unchanged; only the explicitly recovering combinators revert
/// to an earlier successful state instead.
#[derive(Debug, Clone)]
pub struct ParseState<T> {
    pub(crate) input: Rc<str>,
    pub(crate) offset: usize,
    pub(crate) result: Result<T, ParseError>,
}

impl ParseState<()> {
    /// The state that `run` starts from: offset 0, nothing matched yet.
    pub(crate) fn initial(input: &str) -> ParseState<()> {
        ParseState {
            input: Rc::from(input),
            offset: 0,
            result: Ok(()),
        }
    }
}

impl<T> ParseState<T> {
    pub(crate) fn ok(input: Rc<str>, offset: usize, value: T) -> ParseState<T> {
        ParseState {
            input,
            offset,
            result: Ok(value),
        }
    }

    pub(crate) fn fail(input: Rc<str>, offset: usize, error: ParseError) -> ParseState<T> {
        ParseState {
            input,
            offset,
            result: Err(error),
        }
    }

    /// The full input text this state is parsing.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset of the cursor. Advances only on successful primitive
    /// matches, and is unchanged while the state is in error.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_err(&self) -> bool {
        self.result.is_err()
    }

    /// The most recently produced value, if the state is not in error.
    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.result.as_ref().err()
    }

    pub fn into_result(self) -> Result<T, ParseError> {
        self.result
    }

    /// The input from the cursor onward.
    pub(crate) fn remaining(&self) -> &str {
        &self.input[self.offset..]
    }

    /// A position-only snapshot: same input and offset, no value, no error.
    /// This is what the recovering combinators revert to, and what threads
    /// the cursor from one sub-parser into the next.
    pub(crate) fn checkpoint(&self) -> ParseState<()> {
        ParseState {
            input: Rc::clone(&self.input),
            offset: self.offset,
            result: Ok(()),
        }
    }

    /// Fail at this state's position, discarding its value.
    pub(crate) fn fail_with<U>(self, error: ParseError) -> ParseState<U> {
        ParseState::fail(self.input, self.offset, error)
    }

    /// Forward an errored state under a different value type, untouched.
    pub(crate) fn recast<U>(self) -> ParseState<U> {
        match self.result {
            Err(error) => ParseState::fail(self.input, self.offset, error),
            Ok(_) => unreachable!("recast called on a successful state"),
        }
    }

    pub(crate) fn map_value<U>(self, func: impl FnOnce(T) -> U) -> ParseState<U> {
        ParseState {
            input: self.input,
            offset: self.offset,
            result: self.result.map(func),
        }
    }

    pub(crate) fn map_error(self, func: impl FnOnce(ParseError) -> ParseError) -> ParseState<T> {
        ParseState {
            input: self.input,
            offset: self.offset,
            result: self.result.map_err(func),
        }
    }
}
