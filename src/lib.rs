// This design achieves all of the following:
//
// - Parsers are immutable values: applying one never mutates it, so a grammar
//   built once can be shared across any number of `run` calls.
// - The types of parsers is nice `impl Parser<T>`.
// - Parsers can be cloned without having the illegal `Box<Trait + Clone>`.
// - Errors are sticky values in the state, not exceptions. Only the
//   recovering combinators (`choice`, `many0`, `many1`, `many_sep0`,
//   `many_sep1`) ever turn a failed attempt back into progress, and they do
//   it by reverting to the last successful state.
// - Implementing a parser combinator isn't too onerous.
//
// Any change to the design is liable to break one of these properties, so if
// considering a change check this list first.

//! # parser_fn
//!
//! **Composable recursive-descent parsing with pure state-transition
//! combinators.**
//!
//! ```
//! use parser_fn::{digits, sequence_of, string, Parser};
//!
//! let dice = sequence_of(vec![digits().boxed(), string("d").boxed(), digits().boxed()]);
//!
//! let state = dice.run("2d8");
//! assert_eq!(state.offset(), 3);
//! assert_eq!(
//!     state.value(),
//!     Some(&vec!["2".to_owned(), "d".to_owned(), "8".to_owned()])
//! );
//!
//! let err = dice.parse("2x8").unwrap_err();
//! assert_eq!(err.offset(), 1);
//! ```
//!
//! ## Overview
//!
//! This crate centers around the trait [`Parser<T>`](Parser), a pure
//! transition function over [`ParseState`]: state in, state out. A grammar is
//! a static composition graph of parser values built once; [`Parser::run`] on
//! the top-level parser drives a single left-to-right pass over the input,
//! threading the state through the composed transition functions.
//!
//! ### Primitives
//!
//! - [`string`] matches a literal exactly.
//! - [`letters`], [`digits`], [`alphanumerics`] greedily match one-or-more
//!   characters of a fixed ASCII class.
//! - [`regex`] matches an anchored regex (syntax from the
//!   [regex](https://docs.rs/regex/latest/regex/) crate).
//!
//! All of them produce the matched substring as a `String` and advance the
//! offset by exactly its length. They fail without consuming anything.
//!
//! ### Combinators
//!
//! Larger parsers are built up from smaller parsers:
//!
//! ```
//! use parser_fn::{digits, string, Parser};
//!
//! let number = digits().try_map(|s| s.parse::<i64>());
//! let numbers = number.many_sep1(string(","));
//!
//! assert_eq!(numbers.parse("1,2,3").unwrap(), vec![1, 2, 3]);
//! ```
//!
//! Recursive grammars are tied together with [`lazy`], which defers
//! construction of a rule until it is first applied.
//!
//! ### Error handling
//!
//! A failed parse leaves a [`ParseError`] in the final state: a discriminated
//! diagnostic carrying the byte offset at which it occurred. Errors are
//! _sticky_: once a state has failed, every parser applied to it forwards it
//! unchanged ([`Parser::map_err`] may rewrite the message), and only the
//! recovering combinators discard a failed attempt, always by reverting to
//! the last known-good state.
//!
//! ## Reference
//!
//! Here's a quick reference table of the types of all the parser combinators.
//!
//! ```text
//! COMBINATOR              OUTPUT-TYPE     NOTES
//!
//! ~~ primitives ~~
//! string(lit)             String
//! letters()               String
//! digits()                String
//! alphanumerics()         String
//! regex(name, pat)        String
//!
//! ~~ mapping ~~
//! P.map(f)                f(P)
//! P.try_map(f)            f(P)?
//! P.and_then(f)           f(P)            f picks the next parser from P's value
//! P.map_err(f)            P               rewrites the diagnostic only
//!
//! ~~ combination ~~
//! sequence_of(vec)        Vec<P>
//! choice(vec)             P               first success wins, in order
//! P.between(L, R)         P               brackets' outputs are discarded
//!
//! ~~ repetition ~~
//! P.many0()               Vec<P>          never fails
//! P.many1()               Vec<P>
//! P.many_sep0(S)          Vec<P>          never fails, never eats a dangling S
//! P.many_sep1(S)          Vec<P>
//!
//! ~~ recursion ~~
//! lazy(thunk)             P
//! ```

mod lazy;
mod parse_error;
mod primitive;
mod state;

use dyn_clone::{clone_box, DynClone};
use std::error::Error;
use std::marker::PhantomData;

/*========================================*/
/*          Interface                     */
/*========================================*/

pub use lazy::lazy;
pub use parse_error::ParseError;
pub use primitive::{alphanumerics, digits, letters, regex, string};
pub use state::ParseState;

/// A boxed parser, for putting parsers of one output type in a list
/// ([`sequence_of`], [`choice`]) or behind a thunk ([`lazy`]).
pub type BoxedParser<T> = Box<dyn Parser<T>>;

/// A pure state-transition function over [`ParseState`]; the unit of
/// composition.
///
/// Combinators never mutate an existing parser: they construct and return a
/// new one that closes over its inputs. A parser is therefore a reusable
/// value, safe to apply any number of times.
pub trait Parser<T>: DynClone {
    /// Apply this parser's transition function to `state`.
    ///
    /// If `state` is already in error, the parser must return it unchanged
    /// without attempting a match.
    fn apply(&self, state: ParseState<()>) -> ParseState<T>;

    /// Run this parser against `input` from offset 0, returning the final
    /// state. This is the only entry point that manufactures an initial
    /// state.
    fn run(&self, input: &str) -> ParseState<T> {
        self.apply(ParseState::initial(input))
    }

    /// Like [`Parser::run`], but collapse the final state to a `Result`.
    fn parse(&self, input: &str) -> Result<T, ParseError> {
        self.run(input).into_result()
    }

    // ========== Mapping ========== //

    /// Transform this parser's output value with `func`. Does not move the
    /// offset; an error is forwarded unchanged.
    fn map<T2>(self, func: impl Fn(T) -> T2 + Clone) -> impl Parser<T2> + Clone
    where
        Self: Clone,
    {
        MapP {
            parser: self,
            func,
            phantom: PhantomData,
        }
    }

    /// Transform this parser's output value with `func`, producing a parse
    /// error at the value's start offset if `func` returns an `Err`.
    fn try_map<T2, E: Error>(
        self,
        func: impl Fn(T) -> Result<T2, E> + Clone,
    ) -> impl Parser<T2> + Clone
    where
        Self: Clone,
    {
        TryMapP {
            parser: self,
            func,
            phantom: PhantomData,
        }
    }

    /// Dependent sequencing: on success, `func` picks a _new_ parser based on
    /// the just-produced value, which is then applied to the current state.
    /// On error, the error is forwarded unchanged without invoking `func`.
    fn and_then<T2, P2>(self, func: impl Fn(T) -> P2 + Clone) -> impl Parser<T2> + Clone
    where
        Self: Clone,
        P2: Parser<T2>,
    {
        ChainP {
            parser: self,
            func,
            phantom: PhantomData,
        }
    }

    /// Rewrite this parser's error with `func`, keeping the failed status.
    /// A success is forwarded unchanged. Used to produce grammar-specific
    /// diagnostics at composition boundaries.
    fn map_err(self, func: impl Fn(ParseError) -> ParseError + Clone) -> impl Parser<T> + Clone
    where
        Self: Clone,
    {
        MapErrP {
            parser: self,
            func,
            phantom: PhantomData,
        }
    }

    // ========== Repetition ========== //

    /// Apply this parser zero or more times, collecting the values. A failed
    /// attempt ends the loop at the last successful state, so this parser
    /// never fails.
    fn many0(self) -> impl Parser<Vec<T>> + Clone
    where
        Self: Clone,
    {
        Many0P(self, PhantomData)
    }

    /// Apply this parser one or more times, collecting the values. Fails,
    /// anchored at the starting offset, if nothing was collected.
    fn many1(self) -> impl Parser<Vec<T>> + Clone
    where
        Self: Clone,
    {
        Many1P(self, PhantomData)
    }

    /// Apply this parser zero or more times, separated by `sep`s, collecting
    /// this parser's values and discarding the separators'.
    ///
    /// A dangling separator is never consumed: if `sep` matches but the next
    /// element doesn't, the loop stops at the state just after the last
    /// element. Never fails.
    fn many_sep0<T2>(self, sep: impl Parser<T2> + Clone) -> impl Parser<Vec<T>> + Clone
    where
        Self: Clone,
    {
        Sep0P {
            elem: self,
            sep,
            phantom: PhantomData,
        }
    }

    /// Like [`Parser::many_sep0`], but fails, anchored at the starting
    /// offset, if nothing was collected.
    fn many_sep1<T2>(self, sep: impl Parser<T2> + Clone) -> impl Parser<Vec<T>> + Clone
    where
        Self: Clone,
    {
        Sep1P {
            elem: self,
            sep,
            phantom: PhantomData,
        }
    }

    // ========== Sequencing ========== //

    /// Match `left`, then this parser, then `right`, in sequence, yielding
    /// only this parser's value and discarding the brackets'.
    fn between<T2, T3>(
        self,
        left: impl Parser<T2> + Clone,
        right: impl Parser<T3> + Clone,
    ) -> impl Parser<T> + Clone
    where
        Self: Clone,
    {
        BetweenP {
            left,
            content: self,
            right,
            phantom: PhantomData,
        }
    }

    // ========== Boxing ========== //

    /// Box this parser, erasing its concrete type.
    fn boxed(self) -> BoxedParser<T>
    where
        Self: Clone + 'static,
    {
        Box::new(self)
    }
}

impl<T> Clone for Box<dyn Parser<T>> {
    fn clone(&self) -> Self {
        clone_box(self.as_ref())
    }
}

impl<T> Parser<T> for Box<dyn Parser<T>> {
    fn apply(&self, state: ParseState<()>) -> ParseState<T> {
        self.as_ref().apply(state)
    }
}

/*========================================*/
/*          Parser: Map                   */
/*========================================*/

struct MapP<T0, P0: Parser<T0> + Clone, T1, F: Fn(T0) -> T1 + Clone> {
    parser: P0,
    func: F,
    phantom: PhantomData<(T0, T1)>,
}

impl<T0, P0: Parser<T0> + Clone, T1, F: Fn(T0) -> T1 + Clone> Clone for MapP<T0, P0, T1, F> {
    fn clone(&self) -> MapP<T0, P0, T1, F> {
        MapP {
            parser: self.parser.clone(),
            func: self.func.clone(),
            phantom: PhantomData,
        }
    }
}

impl<T0, P0: Parser<T0> + Clone, T1, F: Fn(T0) -> T1 + Clone> Parser<T1> for MapP<T0, P0, T1, F> {
    fn apply(&self, state: ParseState<()>) -> ParseState<T1> {
        self.parser.apply(state).map_value(&self.func)
    }
}

/*========================================*/
/*          Parser: Try Map               */
/*========================================*/

struct TryMapP<T0, P0, T1, E1, F>
where
    P0: Parser<T0> + Clone,
    E1: Error,
    F: Fn(T0) -> Result<T1, E1> + Clone,
{
    parser: P0,
    func: F,
    phantom: PhantomData<(T0, T1)>,
}

impl<T0, P0, T1, E1, F> Clone for TryMapP<T0, P0, T1, E1, F>
where
    P0: Parser<T0> + Clone,
    E1: Error,
    F: Fn(T0) -> Result<T1, E1> + Clone,
{
    fn clone(&self) -> TryMapP<T0, P0, T1, E1, F> {
        TryMapP {
            parser: self.parser.clone(),
            func: self.func.clone(),
            phantom: PhantomData,
        }
    }
}

impl<T0, P0, T1, E1, F> Parser<T1> for TryMapP<T0, P0, T1, E1, F>
where
    P0: Parser<T0> + Clone,
    E1: Error,
    F: Fn(T0) -> Result<T1, E1> + Clone,
{
    fn apply(&self, state: ParseState<()>) -> ParseState<T1> {
        let start = state.offset();
        let ParseState {
            input,
            offset,
            result,
        } = self.parser.apply(state);
        match result {
            Ok(value) => match (self.func)(value) {
                Ok(mapped) => ParseState::ok(input, offset, mapped),
                Err(err) => {
                    ParseState::fail(input, offset, ParseError::custom(err.to_string(), start))
                }
            },
            Err(error) => ParseState::fail(input, offset, error),
        }
    }
}

/*========================================*/
/*          Parser: Chain                 */
/*========================================*/

struct ChainP<T0, P0, T1, P1, F>
where
    P0: Parser<T0> + Clone,
    P1: Parser<T1>,
    F: Fn(T0) -> P1 + Clone,
{
    parser: P0,
    func: F,
    phantom: PhantomData<(T0, T1)>,
}

impl<T0, P0, T1, P1, F> Clone for ChainP<T0, P0, T1, P1, F>
where
    P0: Parser<T0> + Clone,
    P1: Parser<T1>,
    F: Fn(T0) -> P1 + Clone,
{
    fn clone(&self) -> ChainP<T0, P0, T1, P1, F> {
        ChainP {
            parser: self.parser.clone(),
            func: self.func.clone(),
            phantom: PhantomData,
        }
    }
}

impl<T0, P0, T1, P1, F> Parser<T1> for ChainP<T0, P0, T1, P1, F>
where
    P0: Parser<T0> + Clone,
    P1: Parser<T1>,
    F: Fn(T0) -> P1 + Clone,
{
    fn apply(&self, state: ParseState<()>) -> ParseState<T1> {
        let ParseState {
            input,
            offset,
            result,
        } = self.parser.apply(state);
        match result {
            Ok(value) => (self.func)(value).apply(ParseState::ok(input, offset, ())),
            Err(error) => ParseState::fail(input, offset, error),
        }
    }
}

/*========================================*/
/*          Parser: Map Err               */
/*========================================*/

struct MapErrP<T, P: Parser<T> + Clone, F: Fn(ParseError) -> ParseError + Clone> {
    parser: P,
    func: F,
    phantom: PhantomData<T>,
}

impl<T, P: Parser<T> + Clone, F: Fn(ParseError) -> ParseError + Clone> Clone for MapErrP<T, P, F> {
    fn clone(&self) -> MapErrP<T, P, F> {
        MapErrP {
            parser: self.parser.clone(),
            func: self.func.clone(),
            phantom: PhantomData,
        }
    }
}

impl<T, P: Parser<T> + Clone, F: Fn(ParseError) -> ParseError + Clone> Parser<T>
    for MapErrP<T, P, F>
{
    fn apply(&self, state: ParseState<()>) -> ParseState<T> {
        self.parser.apply(state).map_error(&self.func)
    }
}

/*========================================*/
/*          Parser: Sequence              */
/*========================================*/

struct SequenceOfP<T> {
    parsers: Vec<BoxedParser<T>>,
}

impl<T> Clone for SequenceOfP<T> {
    fn clone(&self) -> SequenceOfP<T> {
        SequenceOfP {
            parsers: self.parsers.clone(),
        }
    }
}

impl<T> Parser<Vec<T>> for SequenceOfP<T> {
    fn apply(&self, state: ParseState<()>) -> ParseState<Vec<T>> {
        if state.is_err() {
            return state.recast();
        }
        let mut results = Vec::with_capacity(self.parsers.len());
        let mut cursor = state;
        for parser in &self.parsers {
            let ParseState {
                input,
                offset,
                result,
            } = parser.apply(cursor);
            match result {
                Ok(value) => {
                    results.push(value);
                    cursor = ParseState::ok(input, offset, ());
                }
                // Short-circuit: the first failure's error state is the
                // final state; trailing parsers would all be no-ops on it.
                Err(error) => return ParseState::fail(input, offset, error),
            }
        }
        cursor.map_value(|()| results)
    }
}

/// Apply each parser in order, threading the state from one into the next
/// and collecting their values in the same order.
///
/// If any parser fails, the whole sequence fails with that parser's error,
/// untouched.
pub fn sequence_of<T>(parsers: Vec<BoxedParser<T>>) -> impl Parser<Vec<T>> + Clone {
    SequenceOfP { parsers }
}

/*========================================*/
/*          Parser: Choice                */
/*========================================*/

struct ChoiceP<T> {
    parsers: Vec<BoxedParser<T>>,
}

impl<T> Clone for ChoiceP<T> {
    fn clone(&self) -> ChoiceP<T> {
        ChoiceP {
            parsers: self.parsers.clone(),
        }
    }
}

impl<T> Parser<T> for ChoiceP<T> {
    fn apply(&self, state: ParseState<()>) -> ParseState<T> {
        if state.is_err() {
            return state.recast();
        }
        for parser in &self.parsers {
            // Every branch starts from the original state, never from a
            // prior failed attempt's state.
            let attempt = parser.apply(state.checkpoint());
            if !attempt.is_err() {
                return attempt;
            }
        }
        let offset = state.offset();
        state.fail_with(ParseError::NoAlternativeMatched { offset })
    }
}

/// Try each parser, in order, against the original state; the first success
/// wins. Order is significant: an ambiguous input resolves to the first
/// match, not the longest.
///
/// If every parser fails, the choice fails with a generic diagnostic at the
/// original offset; the branches' own errors are discarded.
pub fn choice<T>(parsers: Vec<BoxedParser<T>>) -> impl Parser<T> + Clone {
    ChoiceP { parsers }
}

/*========================================*/
/*          Parser: Many                  */
/*========================================*/

struct Many0P<T, P: Parser<T> + Clone>(P, PhantomData<T>);

impl<T, P: Parser<T> + Clone> Clone for Many0P<T, P> {
    fn clone(&self) -> Many0P<T, P> {
        Many0P(self.0.clone(), PhantomData)
    }
}

impl<T, P: Parser<T> + Clone> Parser<Vec<T>> for Many0P<T, P> {
    fn apply(&self, state: ParseState<()>) -> ParseState<Vec<T>> {
        if state.is_err() {
            return state.recast();
        }
        let (cursor, results) = repeat(&self.0, state);
        cursor.map_value(|()| results)
    }
}

struct Many1P<T, P: Parser<T> + Clone>(P, PhantomData<T>);

impl<T, P: Parser<T> + Clone> Clone for Many1P<T, P> {
    fn clone(&self) -> Many1P<T, P> {
        Many1P(self.0.clone(), PhantomData)
    }
}

impl<T, P: Parser<T> + Clone> Parser<Vec<T>> for Many1P<T, P> {
    fn apply(&self, state: ParseState<()>) -> ParseState<Vec<T>> {
        if state.is_err() {
            return state.recast();
        }
        let offset = state.offset();
        let (cursor, results) = repeat(&self.0, state);
        if results.is_empty() {
            cursor.fail_with(ParseError::MinimumNotMet {
                combinator: "many1",
                offset,
            })
        } else {
            cursor.map_value(|()| results)
        }
    }
}

/// The shared loop of `many0` and `many1`: apply `parser` until an attempt
/// fails, discarding the failed attempt and keeping the last successful
/// state.
fn repeat<T>(parser: &impl Parser<T>, state: ParseState<()>) -> (ParseState<()>, Vec<T>) {
    let mut results = Vec::new();
    let mut cursor = state;
    loop {
        let ParseState {
            input,
            offset,
            result,
        } = parser.apply(cursor.checkpoint());
        match result {
            Ok(value) => {
                results.push(value);
                cursor = ParseState::ok(input, offset, ());
            }
            Err(_) => return (cursor, results),
        }
    }
}

/*========================================*/
/*          Parser: Sep                   */
/*========================================*/

struct Sep0P<T0, P0, T1, P1>
where
    P0: Parser<T0> + Clone,
    P1: Parser<T1> + Clone,
{
    elem: P0,
    sep: P1,
    phantom: PhantomData<(T0, T1)>,
}

impl<T0, P0, T1, P1> Clone for Sep0P<T0, P0, T1, P1>
where
    P0: Parser<T0> + Clone,
    P1: Parser<T1> + Clone,
{
    fn clone(&self) -> Sep0P<T0, P0, T1, P1> {
        Sep0P {
            elem: self.elem.clone(),
            sep: self.sep.clone(),
            phantom: PhantomData,
        }
    }
}

impl<T0, P0, T1, P1> Parser<Vec<T0>> for Sep0P<T0, P0, T1, P1>
where
    P0: Parser<T0> + Clone,
    P1: Parser<T1> + Clone,
{
    fn apply(&self, state: ParseState<()>) -> ParseState<Vec<T0>> {
        if state.is_err() {
            return state.recast();
        }
        let (cursor, results) = repeat_sep(&self.elem, &self.sep, state);
        cursor.map_value(|()| results)
    }
}

struct Sep1P<T0, P0, T1, P1>
where
    P0: Parser<T0> + Clone,
    P1: Parser<T1> + Clone,
{
    elem: P0,
    sep: P1,
    phantom: PhantomData<(T0, T1)>,
}

impl<T0, P0, T1, P1> Clone for Sep1P<T0, P0, T1, P1>
where
    P0: Parser<T0> + Clone,
    P1: Parser<T1> + Clone,
{
    fn clone(&self) -> Sep1P<T0, P0, T1, P1> {
        Sep1P {
            elem: self.elem.clone(),
            sep: self.sep.clone(),
            phantom: PhantomData,
        }
    }
}

impl<T0, P0, T1, P1> Parser<Vec<T0>> for Sep1P<T0, P0, T1, P1>
where
    P0: Parser<T0> + Clone,
    P1: Parser<T1> + Clone,
{
    fn apply(&self, state: ParseState<()>) -> ParseState<Vec<T0>> {
        if state.is_err() {
            return state.recast();
        }
        let offset = state.offset();
        let (cursor, results) = repeat_sep(&self.elem, &self.sep, state);
        if results.is_empty() {
            cursor.fail_with(ParseError::MinimumNotMet {
                combinator: "many_sep1",
                offset,
            })
        } else {
            cursor.map_value(|()| results)
        }
    }
}

/// The shared loop of `many_sep0` and `many_sep1`: alternately attempt
/// element then separator. Whenever an attempt fails, the loop stops at the
/// state just after the last successful element, so a dangling separator is
/// never consumed.
fn repeat_sep<T0, T1>(
    elem: &impl Parser<T0>,
    sep: &impl Parser<T1>,
    state: ParseState<()>,
) -> (ParseState<()>, Vec<T0>) {
    let mut results = Vec::new();
    // The state reverted to when the loop stops.
    let mut last_good = state;
    // Where the next element attempt starts; past a separator, this is
    // ahead of `last_good`.
    let mut cursor = last_good.checkpoint();
    loop {
        let ParseState {
            input,
            offset,
            result,
        } = elem.apply(cursor);
        match result {
            Ok(value) => {
                results.push(value);
                last_good = ParseState::ok(input, offset, ());
            }
            Err(_) => return (last_good, results),
        }

        let sep_attempt = sep.apply(last_good.checkpoint());
        if sep_attempt.is_err() {
            return (last_good, results);
        }
        cursor = sep_attempt.checkpoint();
    }
}

/*========================================*/
/*          Parser: Between               */
/*========================================*/

struct BetweenP<TL, PL, T, P, TR, PR>
where
    PL: Parser<TL> + Clone,
    P: Parser<T> + Clone,
    PR: Parser<TR> + Clone,
{
    left: PL,
    content: P,
    right: PR,
    phantom: PhantomData<(TL, T, TR)>,
}

impl<TL, PL, T, P, TR, PR> Clone for BetweenP<TL, PL, T, P, TR, PR>
where
    PL: Parser<TL> + Clone,
    P: Parser<T> + Clone,
    PR: Parser<TR> + Clone,
{
    fn clone(&self) -> BetweenP<TL, PL, T, P, TR, PR> {
        BetweenP {
            left: self.left.clone(),
            content: self.content.clone(),
            right: self.right.clone(),
            phantom: PhantomData,
        }
    }
}

impl<TL, PL, T, P, TR, PR> Parser<T> for BetweenP<TL, PL, T, P, TR, PR>
where
    PL: Parser<TL> + Clone,
    P: Parser<T> + Clone,
    PR: Parser<TR> + Clone,
{
    fn apply(&self, state: ParseState<()>) -> ParseState<T> {
        if state.is_err() {
            return state.recast();
        }
        let left = self.left.apply(state);
        if left.is_err() {
            return left.recast();
        }
        let ParseState {
            input,
            offset,
            result,
        } = self.content.apply(left.checkpoint());
        let value = match result {
            Ok(value) => value,
            Err(error) => return ParseState::fail(input, offset, error),
        };
        let right = self.right.apply(ParseState::ok(input, offset, ()));
        right.map_value(|_| value)
    }
}
