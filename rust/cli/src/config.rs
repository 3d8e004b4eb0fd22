use serde::{Deserialize, Serialize};
use std::fs;

use librarian_engine::query::DEFAULT_POSITION_COUNT;

pub const DEFAULT_LIBRARY_PATH: &str = "data/library.sqlite";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub library_path: String,
    pub position_count: u8,
    pub hero_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub library_path: ValueSource,
    pub position_count: ValueSource,
    pub hero_name: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            library_path: ValueSource::Default,
            position_count: ValueSource::Default,
            hero_name: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_path: DEFAULT_LIBRARY_PATH.into(),
            position_count: DEFAULT_POSITION_COUNT,
            hero_name: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "{}", e),
            ConfigError::Parse(e) => write!(f, "{}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("LIBRARIAN_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.library_path {
            cfg.library_path = v;
            sources.library_path = ValueSource::File;
        }
        if let Some(v) = f.position_count {
            cfg.position_count = v;
            sources.position_count = ValueSource::File;
        }
        if let Some(v) = f.hero_name {
            cfg.hero_name = Some(v);
            sources.hero_name = ValueSource::File;
        }
    }

    if let Ok(path) = std::env::var("LIBRARIAN_LIBRARY")
        && !path.is_empty()
    {
        cfg.library_path = path;
        sources.library_path = ValueSource::Env;
    }
    if let Ok(count) = std::env::var("LIBRARIAN_POSITIONS")
        && !count.is_empty()
    {
        cfg.position_count = count
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid position count".into()))?;
        sources.position_count = ValueSource::Env;
    }
    if let Ok(hero) = std::env::var("LIBRARIAN_HERO")
        && !hero.is_empty()
    {
        cfg.hero_name = Some(hero);
        sources.hero_name = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    library_path: Option<String>,
    #[serde(default)]
    position_count: Option<u8>,
    #[serde(default)]
    hero_name: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !(2..=9).contains(&cfg.position_count) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: position_count must be between 2 and 9".into(),
        ));
    }
    if cfg.library_path.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "Invalid configuration: library_path must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn position_count_out_of_range_is_rejected() {
        for bad in [0, 1, 10] {
            let cfg = Config {
                position_count: bad,
                ..Config::default()
            };
            assert!(validate(&cfg).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn file_config_fields_are_optional() {
        let f: FileConfig = toml::from_str("hero_name = \"HumptyD\"").unwrap();
        assert_eq!(f.hero_name.as_deref(), Some("HumptyD"));
        assert!(f.library_path.is_none());
        assert!(f.position_count.is_none());
    }
}
