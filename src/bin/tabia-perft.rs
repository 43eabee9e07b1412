// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use tabia::movegen;
use tabia::Position;

/// Counts legal-move-tree leaves per root move, a standard way to exercise a
/// move generator against known node counts.
#[derive(Debug, StructOpt)]
struct Options {
    /// The depth to count to.
    #[structopt(short, long)]
    depth: u32,

    /// FEN representation of the position to analyze.
    #[structopt(name = "FEN")]
    fen: String,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_env_filter(EnvFilter::from_env("TABIA_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let mut pos = Position::from_fen(&ops.fen).context("invalid FEN")?;
    let mut total = 0;
    for mov in movegen::legal_moves(&pos) {
        pos.make_move(mov);
        let nodes = movegen::perft(&mut pos, ops.depth.saturating_sub(1));
        pos.unmake_move();
        total += nodes;
        println!("{}: {}", mov.as_coordinate(), nodes);
    }

    println!("total: {}", total);
    Ok(())
}
