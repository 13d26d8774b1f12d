// src/bin/profile_me.rs
use critdice::{RandomDice, default_roller};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

fn main() {
    // Spells, weapons, criticals and advantage all in one request
    let complex_spec =
        "critical greatsword plus disintegrate at 7th level times 2 minus 1d20 with advantage";

    // Building the default roller parses the ruleset and builds the grammar
    let roller = match default_roller() {
        Ok(roller) => roller,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    let mut dice = RandomDice::from_rng(StdRng::seed_from_u64(42));

    println!("Starting profile loop...");

    for _ in 0..200_000 {
        let _ = black_box(roller.roll_with(black_box(complex_spec), &mut dice));
    }

    println!("Done.");
}
