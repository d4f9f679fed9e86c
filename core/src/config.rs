use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

/// Quiet period a keystroke must survive before it becomes a committed
/// query.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;
const DEFAULT_HOTKEY: char = 'k';
const DEFAULT_MAX_HITS: usize = 50;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("hotkey must be a single ascii letter, got {0:?}")]
    InvalidHotkey(String),
}

/// Palette settings, loaded from an optional `spotlight.toml`. Every field
/// has a default so an absent file is a valid (empty) config; CLI flags
/// override file values at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteConfig {
    pub debounce_ms: u64,
    /// Letter toggling the overlay together with the platform modifier.
    pub hotkey: char,
    /// Cap on hits a backend response contributes to one grouping pass.
    pub max_hits: usize,
    /// Dataset the demo backend serves.
    pub dataset: Option<PathBuf>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            hotkey: DEFAULT_HOTKEY,
            max_hits: DEFAULT_MAX_HITS,
            dataset: None,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct PaletteConfigToml {
    debounce_ms: Option<u64>,
    hotkey: Option<String>,
    max_hits: Option<usize>,
    dataset: Option<PathBuf>,
}

impl PaletteConfig {
    /// Loads `path` if it exists; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let parsed: PaletteConfigToml =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml(parsed)
    }

    fn from_toml(parsed: PaletteConfigToml) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let hotkey = match parsed.hotkey {
            None => defaults.hotkey,
            Some(raw) => parse_hotkey(&raw)?,
        };
        Ok(Self {
            debounce_ms: parsed.debounce_ms.unwrap_or(defaults.debounce_ms),
            hotkey,
            max_hits: parsed.max_hits.unwrap_or(defaults.max_hits),
            dataset: parsed.dataset,
        })
    }
}

fn parse_hotkey(raw: &str) -> Result<char, ConfigError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_alphabetic() => Ok(ch.to_ascii_lowercase()),
        _ => Err(ConfigError::InvalidHotkey(raw.to_string())),
    }
}
