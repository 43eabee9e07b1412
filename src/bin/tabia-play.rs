// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::bail;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use tabia::movegen;
use tabia::Position;

/// Plays random legal moves from the starting position, then unwinds the
/// whole game and checks that the start position comes back intact. A demo
/// of the API and a smoke harness for make/unmake in one.
#[derive(Debug, StructOpt)]
struct Options {
    /// Number of plies to play.
    #[structopt(short, long, default_value = "40")]
    plies: u32,

    /// Seed for the random number generator.
    #[structopt(short, long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_env_filter(EnvFilter::from_env("TABIA_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let mut rng = match ops.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut pos = Position::new_game();
    let start = pos.as_fen();
    let mut played = 0;
    for _ in 0..ops.plies {
        let moves = movegen::legal_moves(&pos);
        if moves.is_empty() {
            println!("no legal moves after {} plies", played);
            break;
        }

        let mov = moves[rng.gen_range(0..moves.len())];
        println!("{:>3}. {}", played + 1, mov.as_coordinate());
        pos.make_move(mov);
        played += 1;
    }

    println!("{}", pos);

    for _ in 0..played {
        pos.unmake_move();
    }

    if pos.as_fen() != start {
        bail!("unwinding {} plies did not restore the start position", played);
    }

    println!("unwound {} plies back to the start position", played);
    Ok(())
}
