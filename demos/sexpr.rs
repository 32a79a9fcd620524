use parser_fn::{choice, digits, lazy, string, BoxedParser, Parser};

// A prefix-operator S-expression calculator: `(<op> <expr> <expr>)` where
// `op` is one of + - * /. Division follows IEEE-754: dividing by zero yields
// an infinity, not an error.

// > echo "(+ (* 2 3) 4)" | cargo run --example sexpr
// 10

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

fn number() -> impl Parser<Expr> + Clone {
    digits().try_map(|s| s.parse::<f64>()).map(Expr::Number)
}

fn operator() -> impl Parser<Op> + Clone {
    choice(vec![
        string("+").map(|_| Op::Add).boxed(),
        string("-").map(|_| Op::Sub).boxed(),
        string("*").map(|_| Op::Mul).boxed(),
        string("/").map(|_| Op::Div).boxed(),
    ])
}

/// A space-prefixed operand of an operation.
fn operand() -> BoxedParser<Expr> {
    string(" ").and_then(|_| lazy(expression)).boxed()
}

// `expression` and `operation` are mutually recursive; `lazy` defers each
// rule's construction until first use so they can reference each other.

fn expression() -> BoxedParser<Expr> {
    choice(vec![number().boxed(), lazy(operation).boxed()]).boxed()
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

fn main() {
    use std::io;

    let parser = expression();
    let input = io::read_to_string(io::stdin()).unwrap();
    match parser.parse(input.trim()) {
        Err(err) => println!("{}", err),
        Ok(expr) => println!("{}", evaluate(&expr)),
    }
}
