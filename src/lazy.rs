use crate::state::ParseState;
use crate::{BoxedParser, Parser};
use std::cell::OnceCell;
use std::rc::Rc;

/*========================================*/
/*          Parser: Lazy                  */
/*========================================*/

struct LazyP<T, F: Fn() -> BoxedParser<T> + Clone> {
    thunk: F,
    // Shared across clones so the thunk runs at most once.
    cell: Rc<OnceCell<BoxedParser<T>>>,
}

impl<T, F: Fn() -> BoxedParser<T> + Clone> Clone for LazyP<T, F> {
    fn clone(&self) -> LazyP<T, F> {
        LazyP {
            thunk: self.thunk.clone(),
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T, F: Fn() -> BoxedParser<T> + Clone> Parser<T> for LazyP<T, F> {
    fn apply(&self, state: ParseState<()>) -> ParseState<T> {
        let parser = self.cell.get_or_init(|| (self.thunk)());
        parser.apply(state)
    }
}

/// Defer construction of a parser until it is first applied.
///
/// This is what makes self-referential grammars constructible: a rule can
/// mention another rule (or itself) through a thunk before that rule has been
/// built. Write mutually recursive rules as `fn` items and reference them
/// with `lazy`:
///
/// ```
/// use parser_fn::{choice, digits, lazy, string, BoxedParser, Parser};
///
/// // value := digits | '[' value ']'
/// fn value() -> BoxedParser<String> {
///     choice(vec![digits().boxed(), lazy(nested).boxed()]).boxed()
/// }
///
/// fn nested() -> BoxedParser<String> {
///     lazy(value).between(string("["), string("]")).boxed()
/// }
///
/// assert_eq!(value().parse("[[7]]").unwrap(), "7");
/// ```
///
/// The thunk is called at most once per `lazy` parser; the built parser is
/// cached and shared by clones.
pub fn lazy<T: 'static>(thunk: impl Fn() -> BoxedParser<T> + Clone + 'static) -> impl Parser<T> + Clone {
    LazyP {
        thunk,
        cell: Rc::new(OnceCell::new()),
    }
}
