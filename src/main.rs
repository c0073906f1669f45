use clap::Parser;

use slate_engine::cli;
use slate_engine::cli::parsers::{CliMode, CliParser};

fn main() {
    dotenvy::dotenv().ok();

    let args = CliParser::parse();

    match args.mode {
        Some(CliMode::Client) => cli::run_client(),
        Some(CliMode::Server) => cli::run_server(),
        None => {}
    }
}
