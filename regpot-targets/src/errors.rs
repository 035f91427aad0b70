use regpot_core::RegionModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegPotError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported config file type: {0}. Use .toml, .yaml or .yml")]
    ConfigFileType(String),

    #[error(transparent)]
    Model(#[from] RegionModelError),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegPotError>;
