// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use serde::Serialize;
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use tabia::movegen;
use tabia::Position;

/// Prints the legal moves of a position.
#[derive(Debug, StructOpt)]
struct Options {
    /// FEN representation of the position to analyze.
    #[structopt(name = "FEN")]
    fen: String,

    /// Emit the move list as JSON, one record per line.
    #[structopt(long)]
    json: bool,
}

#[derive(Serialize)]
struct MoveRecord {
    from: String,
    to: String,
    piece: char,
    capture: Option<char>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_env_filter(EnvFilter::from_env("TABIA_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let pos = Position::from_fen(&ops.fen).context("invalid FEN")?;
    for mov in movegen::legal_moves(&pos) {
        if ops.json {
            let record = MoveRecord {
                from: mov.source().to_string(),
                to: mov.destination().to_string(),
                piece: mov.piece_moved().as_char(),
                capture: mov.piece_captured().map(|p| p.as_char()),
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", mov.as_coordinate());
        }
    }

    Ok(())
}
