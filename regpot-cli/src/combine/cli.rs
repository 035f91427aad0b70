use clap::{Command, arg};

pub const COMBINE_CMD: &str = "combine";

pub fn create_combine_cli() -> Command {
    Command::new(COMBINE_CMD)
        .about("Score shared targets of two factors on the product of their fold changes.")
        .arg(
            arg!(--input <INPUT>)
                .required(true)
                .help("Path to input JSON with `factor_a` and `factor_b`, each `{name, peaks, regions}`"),
        )
        .arg(
            arg!(--fc <FC>)
                .required(false)
                .default_value("fc")
                .help("Name of the fold-change statistic in both factors' regions"),
        )
        .arg(
            arg!(--config <CONFIG>)
                .required(false)
                .help("Path to engine config (.toml or .yaml)"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: stdout)"),
        )
}
