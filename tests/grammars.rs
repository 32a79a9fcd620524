//! The engine exercised the way its consumers use it: a dice-roll notation,
//! a tagged-value grammar, a nested array grammar, and the arithmetic
//! S-expression micro-language.

use parser_fn::{choice, digits, lazy, string, BoxedParser, Parser};

/*========================================*/
/*          Dice rolls                    */
/*========================================*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DiceRoll {
    count: u32,
    sides: u32,
}

fn dice_roll() -> impl Parser<DiceRoll> + Clone {
    digits().try_map(|s| s.parse::<u32>()).and_then(|count| {
        string("d").and_then(move |_| {
            digits()
                .try_map(|s| s.parse::<u32>())
                .map(move |sides| DiceRoll { count, sides })
        })
    })
}

#[test]
fn dice_roll_via_dependent_sequencing() {
    let state = dice_roll().run("2d8");
    assert_eq!(state.value(), Some(&DiceRoll { count: 2, sides: 8 }));
    assert_eq!(state.offset(), 3);

    assert!(dice_roll().parse("2x8").is_err());
}

#[test]
fn dice_roll_max_total_does_not_overflow() {
    let roll = dice_roll().parse("99999999d99999999").unwrap();
    let max_total = u64::from(roll.count) * u64::from(roll.sides);
    assert_eq!(max_total, 9_999_999_800_000_001);
}

/*========================================*/
/*          Tagged values                 */
/*========================================*/

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(i64),
}

#[test]
fn tagged_values_dispatch_on_the_variant() {
    let token = choice(vec![
        letters_token(),
        digits()
            .try_map(|s| s.parse::<i64>())
            .map(Token::Number)
            .boxed(),
    ]);

    assert_eq!(
        token.parse("hello").unwrap(),
        Token::Word("hello".to_owned())
    );
    assert_eq!(token.parse("42").unwrap(), Token::Number(42));
}

fn letters_token() -> BoxedParser<Token> {
    parser_fn::letters().map(Token::Word).boxed()
}

/*========================================*/
/*          Nested arrays                 */
/*========================================*/

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Number(i64),
    List(Vec<Value>),
}

// element and array are mutually recursive through `lazy`.

fn element() -> BoxedParser<Value> {
    let number = digits().try_map(|s| s.parse::<i64>()).map(Value::Number);
    choice(vec![number.boxed(), lazy(array).boxed()]).boxed()
}

fn array() -> BoxedParser<Value> {
    lazy(element)
        .many_sep0(string(","))
        .between(string("["), string("]"))
        .map(Value::List)
        .boxed()
}

#[test]
fn nested_arrays_reconstruct_the_nested_list() {
    use Value::{List, Number};

    let input = "[1,[2,3]]";
    let state = array().run(input);
    assert_eq!(
        state.value(),
        Some(&List(vec![Number(1), List(vec![Number(2), Number(3)])]))
    );
    // The whole input is consumed.
    assert_eq!(state.offset(), input.len());

    assert_eq!(array().parse("[]").unwrap(), List(vec![]));
}

/*========================================*/
/*          S-expression calculator       */
/*========================================*/

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone)]
enum Expr {
    Number(f64),
    Operation {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

fn operator() -> impl Parser<Op> + Clone {
    choice(vec![
        string("+").map(|_| Op::Add).boxed(),
        string("-").map(|_| Op::Sub).boxed(),
        string("*").map(|_| Op::Mul).boxed(),
        string("/").map(|_| Op::Div).boxed(),
    ])
}

fn operand() -> BoxedParser<Expr> {
    string(" ").and_then(|_| lazy(expression)).boxed()
}

fn expression() -> BoxedParser<Expr> {
    let number = digits().try_map(|s| s.parse::<f64>()).map(Expr::Number);
    choice(vec![number.boxed(), lazy(operation).boxed()]).boxed()
}

fn operation() -> BoxedParser<Expr> {
    operator()
        .and_then(|op| {
            operand().and_then(move |left| {
                operand().map(move |right| Expr::Operation {
                    op,
                    left: Box::new(left.clone()),
                    right: Box::new(right),
                })
            })
        })
        .between(string("("), string(")"))
        .boxed()
}

fn evaluate(expr: &Expr) -> f64 {
    match expr {
        Expr::Number(n) => *n,
        Expr::Operation { op, left, right } => {
            let (a, b) = (evaluate(left), evaluate(right));
            match op {
                Op::Add => a + b,
                Op::Sub => a - b,
                Op::Mul => a * b,
                Op::Div => a / b,
            }
        }
    }
}

fn interpret(program: &str) -> Result<f64, parser_fn::ParseError> {
    expression().parse(program).map(|expr| evaluate(&expr))
}

#[test]
fn sexpr_recursion_terminates_and_evaluates() {
    assert_eq!(interpret("(+ (* 2 3) 4)").unwrap(), 10.0);
    assert_eq!(interpret("7").unwrap(), 7.0);

    let result = interpret("(+ (* 50 5) (* (/ 50 (- 50 970)) 6))").unwrap();
    assert!((result - 249.67391304347825).abs() < 1e-9);
}

#[test]
fn division_by_zero_propagates_an_infinity() {
    assert!(interpret("(/ 50 0)").unwrap().is_infinite());
}

#[test]
fn sexpr_parse_failure_identifies_the_offset() {
    // The top-level rule is a choice, so a bad program surfaces the
    // choice's diagnostic at the offset where no alternative matched.
    let err = interpret("(+ 1 x)").unwrap_err();
    assert_eq!(err, parser_fn::ParseError::NoAlternativeMatched { offset: 0 });
}
