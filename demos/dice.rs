use parser_fn::{digits, string, Parser};

// Parses dice notation: `<count>d<sides>`, e.g. "3d6". The second digit
// group is reached through `and_then`, so what is parsed after the 'd'
// depends on having parsed a count first.

// > echo "3d6" | cargo run --example dice
// 3 dice with 6 sides (max total 18)

#[derive(Debug, Clone, Copy)]
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

fn main() {
    use std::io;

    let input = io::read_to_string(io::stdin()).unwrap();
    match dice_roll().parse(input.trim()) {
        Err(err) => println!("{}", err),
        Ok(roll) => println!(
            "{} dice with {} sides (max total {})",
            roll.count,
            roll.sides,
            // Widened: u32 counts and sides can overflow a u32 product.
            u64::from(roll.count) * u64::from(roll.sides)
        ),
    }
}
