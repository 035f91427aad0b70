mod combine;
mod predict;
mod targets;
mod utils;

use anyhow::Result;
use clap::{Command, arg};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "regpot";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Rank transcription factor targets by regulatory potential and test binding against differential expression.")
        .subcommand_required(true)
        .arg(arg!(-v --verbose "Print debug messages").global(true))
        .subcommand(targets::cli::create_targets_cli())
        .subcommand(predict::cli::create_predict_cli())
        .subcommand(combine::cli::create_combine_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match matches.subcommand() {
        //
        // DIRECT TARGETS
        //
        Some((targets::cli::TARGETS_CMD, matches)) => {
            targets::handlers::run_targets(matches)?;
        }

        //
        // PREDICTION TEST
        //
        Some((predict::cli::PREDICT_CMD, matches)) => {
            predict::handlers::run_predict(matches)?;
        }

        //
        // TWO-FACTOR COMBINATION
        //
        Some((combine::cli::COMBINE_CMD, matches)) => {
            combine::handlers::run_combine(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
