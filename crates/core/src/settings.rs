//! Game settings: defaults, JSON files and `NESTRIS_*` environment overrides.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::input::{DasBehavior, DasSettings, DasSpeed};
use crate::rng::{parse_sequence, PieceRandomizer, SequenceError};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("inconsistent DAS settings: charges must not exceed a non-zero trigger threshold")]
    InvalidDas,
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSettings {
    pub starting_level: u32,
    pub das: DasSettings,
    /// First level transition after 10 lines regardless of starting level.
    pub transition_every_10_lines: bool,
    /// Level up on every clear.
    pub transition_every_line: bool,
    /// Add an entry-delay penalty after every non-clearing lock.
    pub no_adjustment: bool,
    /// Fixed piece letters dealt cyclically instead of the random sequence.
    pub piece_sequence: Option<String>,
    pub seed: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starting_level: 0,
            das: DasSettings::default(),
            transition_every_10_lines: false,
            transition_every_line: false,
            no_adjustment: false,
            piece_sequence: None,
            seed: 1,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl GameSettings {
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Defaults overridden by `NESTRIS_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Layer overrides from a key lookup. Unparsable values are logged and skipped.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T, F: Fn(&str) -> Option<String>>(
            lookup: &F,
            key: &str,
            parse: impl Fn(&str) -> Option<T>,
        ) -> Option<T> {
            let raw = lookup(key)?;
            let value = parse(&raw);
            if value.is_none() {
                warn!(key, value = %raw, "ignoring unparsable setting");
            }
            value
        }

        if let Some(level) = parsed(&lookup, "NESTRIS_STARTING_LEVEL", |v| v.trim().parse().ok()) {
            self.starting_level = level;
        }
        if let Some(seed) = parsed(&lookup, "NESTRIS_SEED", |v| v.trim().parse().ok()) {
            self.seed = seed;
        }

        let speed = parsed(&lookup, "NESTRIS_DAS_SPEED", DasSpeed::from_str);
        let behavior = parsed(&lookup, "NESTRIS_DAS_BEHAVIOR", DasBehavior::from_str);
        if speed.is_some() || behavior.is_some() {
            self.das = DasSettings::preset(speed.unwrap_or_default(), behavior.unwrap_or_default());
        }

        if let Some(v) = parsed(&lookup, "NESTRIS_NO_ADJUSTMENT", parse_bool) {
            self.no_adjustment = v;
        }
        if let Some(v) = parsed(&lookup, "NESTRIS_TRANSITION_10", parse_bool) {
            self.transition_every_10_lines = v;
        }
        if let Some(seq) = parsed(&lookup, "NESTRIS_PIECE_SEQUENCE", |v| {
            parse_sequence(v).ok().map(|_| v.to_string())
        }) {
            self.piece_sequence = Some(seq);
        }
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.das.is_consistent() {
            return Err(SettingsError::InvalidDas);
        }
        if let Some(seq) = &self.piece_sequence {
            parse_sequence(seq)?;
        }
        Ok(())
    }

    /// Randomizer described by these settings.
    pub fn randomizer(&self) -> Result<PieceRandomizer, SettingsError> {
        match &self.piece_sequence {
            Some(seq) => Ok(PieceRandomizer::from_sequence_str(seq)?),
            None => Ok(PieceRandomizer::new(self.seed)),
        }
    }
}
