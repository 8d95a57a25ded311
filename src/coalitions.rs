//! Coalition definitions and keyword-based party classification.
//!
//! The config file is an ordered JSON array; order matters. When a party
//! name matches the keyword lists of more than one coalition, the one
//! configured first wins, so broad catch-all keywords belong at the end
//! of the file.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref HEX_COLOR_RX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read coalition config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse coalition config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate coalition key: {0}")]
    DuplicateKey(String),
    #[error("coalition {0} has an empty keyword list")]
    EmptyKeywords(String),
    #[error("coalition {0} has a blank keyword, which would match every party")]
    BlankKeyword(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// One gradient stop: `at` is a vote share in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub at: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoalitionDefinition {
    pub key: String,
    pub display_name: String,
    /// Case-insensitive substrings tested against scraped party names.
    pub keywords: Vec<String>,
    #[serde(default)]
    pub color_scale: Vec<ColorStop>,
}

/// Gradient used when a coalition's color scale is missing or malformed.
fn default_color_scale() -> Vec<ColorStop> {
    vec![
        ColorStop {
            at: 0.0,
            color: "#f0f9e8".to_string(),
        },
        ColorStop {
            at: 1.0,
            color: "#0868ac".to_string(),
        },
    ]
}

fn valid_scale(stops: &[ColorStop]) -> bool {
    stops.len() >= 2 && stops.iter().all(|s| s.at.is_finite() && HEX_COLOR_RX.is_match(&s.color))
}

/// An ordered list of coalition definitions with validated keys and
/// normalized (lowercased) keywords.
#[derive(Debug, Clone)]
pub struct CoalitionRegistry {
    coalitions: Vec<CoalitionDefinition>,
}

impl CoalitionRegistry {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let defs: Vec<CoalitionDefinition> =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_definitions(defs)
    }

    pub fn from_definitions(mut defs: Vec<CoalitionDefinition>) -> ConfigResult<Self> {
        let mut seen = HashSet::new();
        for def in &mut defs {
            if !seen.insert(def.key.clone()) {
                return Err(ConfigError::DuplicateKey(def.key.clone()));
            }
            if def.keywords.is_empty() {
                return Err(ConfigError::EmptyKeywords(def.key.clone()));
            }
            for kw in &mut def.keywords {
                *kw = kw.trim().to_lowercase();
                if kw.is_empty() {
                    return Err(ConfigError::BlankKeyword(def.key.clone()));
                }
            }
            if valid_scale(&def.color_scale) {
                def.color_scale
                    .sort_by(|a, b| a.at.partial_cmp(&b.at).unwrap_or(Ordering::Equal));
            } else {
                def.color_scale = default_color_scale();
            }
        }
        Ok(Self { coalitions: defs })
    }

    /// Index of the first coalition whose keyword list matches the party
    /// name, or None for an unclassified party.
    pub fn classify_index(&self, party_name: &str) -> Option<usize> {
        let name = party_name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        self.coalitions
            .iter()
            .position(|def| def.keywords.iter().any(|kw| name.contains(kw.as_str())))
    }

    pub fn classify(&self, party_name: &str) -> Option<&str> {
        self.classify_index(party_name)
            .map(|i| self.coalitions[i].key.as_str())
    }

    pub fn coalitions(&self) -> &[CoalitionDefinition] {
        &self.coalitions
    }

    pub fn len(&self) -> usize {
        self.coalitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coalitions.is_empty()
    }
}
