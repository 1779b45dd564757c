//! WeLoveMovies CLI: the `wlm` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Group {
            shape,
            rows,
            key,
            json,
        } => commands::group::run(shape, rows, key, json),

        Commands::Map { shape, rows, json } => commands::map::run(shape, rows, json),

        Commands::Flatten { shape, input, json } => commands::flatten::run(shape, input, json),

        Commands::ShapeCheck { shape, json } => commands::shape_check::run(shape, json),

        Commands::Catalog { view, rows, json } => commands::catalog::run(view, rows, json),
    }
}
