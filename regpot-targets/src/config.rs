use std::ffi::OsStr;
use std::fmt::{self, Display};
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{RegPotError, Result};
use crate::ks::Alternative;

pub const DEFAULT_FLANK_WINDOW: i64 = 100_000;
pub const DEFAULT_DECAY_CONSTANT: f64 = 100_000.0;
pub const NUM_GROUPS: usize = 3;
pub const DEFAULT_STAT: &str = "fc";

/// Which region field names a target row.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegionKey {
    #[default]
    GeneId,
    RegionId,
}

/// The expression statistic(s) combined with binding.
///
/// A single name selects that statistic; a pair selects the product of the two,
/// whose sign tells whether two factors move expression the same way.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum StatKey {
    Single(String),
    Pair(String, String),
}

impl StatKey {
    pub fn names(&self) -> Vec<&str> {
        match self {
            StatKey::Single(name) => vec![name.as_str()],
            StatKey::Pair(a, b) => vec![a.as_str(), b.as_str()],
        }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, StatKey::Pair(..))
    }
}

impl Default for StatKey {
    fn default() -> Self {
        StatKey::Single(DEFAULT_STAT.to_string())
    }
}

impl Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatKey::Single(name) => write!(f, "{}", name),
            StatKey::Pair(a, b) => write!(f, "{}*{}", a, b),
        }
    }
}

///
/// Engine configuration. Every field has a default, so a config file only needs
/// the keys it changes.
///
/// ```toml
/// region_key = "gene_id"
/// stat_key = ["yy1.fc", "yy2.fc"]
/// flank_window = 100000
/// decay_constant = 100000.0
/// alternative = "greater"
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub region_key: RegionKey,
    pub stat_key: StatKey,
    /// Maximum distance (bp) between a peak midpoint and a region anchor.
    pub flank_window: i64,
    /// Distance (bp) at which a peak's contribution halves.
    pub decay_constant: f64,
    pub num_groups: usize,
    pub alternative: Alternative,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            region_key: RegionKey::default(),
            stat_key: StatKey::default(),
            flank_window: DEFAULT_FLANK_WINDOW,
            decay_constant: DEFAULT_DECAY_CONSTANT,
            num_groups: NUM_GROUPS,
            alternative: Alternative::Greater,
        }
    }
}

impl EngineConfig {
    pub fn with_stat_key(mut self, stat_key: StatKey) -> Self {
        self.stat_key = stat_key;
        self
    }

    pub fn with_region_key(mut self, region_key: RegionKey) -> Self {
        self.region_key = region_key;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.flank_window < 0 {
            return Err(RegPotError::InvalidConfiguration(format!(
                "flank_window must be non-negative, got {}",
                self.flank_window
            )));
        }
        if self.flank_window > u32::MAX as i64 {
            return Err(RegPotError::InvalidConfiguration(format!(
                "flank_window {} exceeds the coordinate range",
                self.flank_window
            )));
        }
        if !self.decay_constant.is_finite() || self.decay_constant <= 0.0 {
            return Err(RegPotError::InvalidConfiguration(format!(
                "decay_constant must be a positive finite number, got {}",
                self.decay_constant
            )));
        }
        if self.num_groups != NUM_GROUPS {
            return Err(RegPotError::InvalidConfiguration(format!(
                "num_groups is fixed at {}, got {}",
                NUM_GROUPS, self.num_groups
            )));
        }
        if self.stat_key.names().iter().any(|name| name.is_empty()) {
            return Err(RegPotError::InvalidConfiguration(
                "stat_key names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The flank window as a coordinate. Only meaningful after [EngineConfig::validate].
    pub fn window(&self) -> u32 {
        self.flank_window.clamp(0, u32::MAX as i64) as u32
    }
}

#[derive(Debug, PartialEq)]
pub enum ConfigFileType {
    Toml,
    Yaml,
}

impl ConfigFileType {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => Ok(ConfigFileType::Toml),
            Some("yaml") | Some("yml") => Ok(ConfigFileType::Yaml),
            _ => Err(RegPotError::ConfigFileType(path.display().to_string())),
        }
    }
}

impl TryFrom<&Path> for EngineConfig {
    type Error = RegPotError;

    fn try_from(path: &Path) -> Result<Self> {
        let file_type = ConfigFileType::from_path(path)?;
        let raw = read_to_string(path)?;
        let config: EngineConfig = match file_type {
            ConfigFileType::Toml => toml::from_str(&raw)?,
            ConfigFileType::Yaml => serde_yaml::from_str(&raw)?,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.validate().is_ok(), true);
        assert_eq!(config.window(), 100_000);
        assert_eq!(config.stat_key, StatKey::Single("fc".to_string()));
    }

    #[rstest]
    fn test_parse_partial_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            region_key = "region_id"
            stat_key = ["a.fc", "b.fc"]
            alternative = "two_sided"
            "#,
        )
        .unwrap();

        assert_eq!(config.region_key, RegionKey::RegionId);
        assert_eq!(
            config.stat_key,
            StatKey::Pair("a.fc".to_string(), "b.fc".to_string())
        );
        assert_eq!(config.alternative, Alternative::TwoSided);
        assert_eq!(config.flank_window, DEFAULT_FLANK_WINDOW);
    }

    #[rstest]
    fn test_parse_yaml() {
        let config: EngineConfig =
            serde_yaml::from_str("stat_key: log2fc\nflank_window: 50000\n").unwrap();
        assert_eq!(config.stat_key, StatKey::Single("log2fc".to_string()));
        assert_eq!(config.window(), 50_000);
    }

    #[rstest]
    #[case(EngineConfig { flank_window: -1, ..EngineConfig::default() })]
    #[case(EngineConfig { decay_constant: -5.0, ..EngineConfig::default() })]
    #[case(EngineConfig { decay_constant: 0.0, ..EngineConfig::default() })]
    #[case(EngineConfig { num_groups: 4, ..EngineConfig::default() })]
    #[case(EngineConfig::default().with_stat_key(StatKey::Single(String::new())))]
    fn test_invalid_configuration(#[case] config: EngineConfig) {
        assert!(matches!(
            config.validate(),
            Err(RegPotError::InvalidConfiguration(_))
        ));
    }

    #[rstest]
    fn test_config_file_type() {
        assert_eq!(
            ConfigFileType::from_path(Path::new("engine.toml")).unwrap(),
            ConfigFileType::Toml
        );
        assert_eq!(
            ConfigFileType::from_path(Path::new("engine.yml")).unwrap(),
            ConfigFileType::Yaml
        );
        assert_eq!(ConfigFileType::from_path(Path::new("engine.json")).is_err(), true);
    }
}
