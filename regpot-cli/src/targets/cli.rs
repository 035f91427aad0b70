use clap::{Command, arg};

pub const TARGETS_CMD: &str = "targets";

pub fn create_targets_cli() -> Command {
    Command::new(TARGETS_CMD)
        .about("Assign peaks to regions and rank direct targets.")
        .arg(
            arg!(--input <INPUT>)
                .required(true)
                .help("Path to input JSON with `peaks` and `regions`"),
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
