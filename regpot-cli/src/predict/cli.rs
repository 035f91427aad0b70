use clap::{Command, arg};

pub const PREDICT_CMD: &str = "predict";

pub fn create_predict_cli() -> Command {
    Command::new(PREDICT_CMD)
        .about("Rank direct targets and test them against the direction of regulation.")
        .arg(
            arg!(--input <INPUT>)
                .required(true)
                .help("Path to input JSON: one factor `{peaks, regions}` or a list of `{name, peaks, regions}`"),
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
