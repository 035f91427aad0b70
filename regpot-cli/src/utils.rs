use std::fs::{File, read_to_string};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;

use regpot_targets::EngineConfig;

pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let raw = read_to_string(path).with_context(|| format!("Failed to read input file: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse input JSON: {}", path))
}

/// The engine configuration from `--config`, or the defaults.
pub fn load_config(path: Option<&String>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::try_from(Path::new(p))
            .with_context(|| format!("Failed to load config: {}", p)),
        None => Ok(EngineConfig::default()),
    }
}

/// Pretty JSON to `--output`, or stdout.
pub fn write_output<T: Serialize>(output: &T, path: Option<&String>) -> Result<()> {
    let json = serde_json::to_string_pretty(output).context("Failed to serialize output to JSON")?;

    match path {
        Some(p) => {
            let mut file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            file.write_all(json.as_bytes())?;
            info!("Output written to {}", p);
        }
        None => {
            io::stdout().write_all(json.as_bytes())?;
            println!();
        }
    }

    Ok(())
}
