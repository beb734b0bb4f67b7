use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::OkrError;
use crate::models::{Criteria, CriteriaVocabulary, Habit};

pub const CONFIG_ENV: &str = "OKRTRACK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "okrtrack.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the note vault.
    pub vault: Option<PathBuf>,
    /// Daily notes directory, relative to the vault root.
    pub daily_notes: PathBuf,
    /// chrono format of daily note names.
    pub daily_note_format: String,
    /// Name of the note defining the current OKR cycle.
    pub cycle_note: Option<String>,
    pub habits: Vec<Habit>,
    pub criteria: CriteriaVocabulary,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault: None,
            daily_notes: PathBuf::from("Daily"),
            daily_note_format: "%Y-%m-%d".to_string(),
            cycle_note: None,
            habits: Vec::new(),
            criteria: CriteriaVocabulary::default(),
        }
    }
}

impl Config {
    /// Load from `explicit`, else `$OKRTRACK_CONFIG`, else `./okrtrack.toml`.
    /// Falls back to defaults when no file is found on the implicit paths.
    pub fn load(explicit: Option<&Path>) -> Result<Self, OkrError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, OkrError> {
        let text = fs::read_to_string(path)
            .map_err(|e| OkrError::config(format!("Cannot read {}: {e}", path.display())))?;
        let mut config: Config = toml::from_str(&text)?;
        // A relative vault path is taken relative to the config file.
        if let (Some(vault), Some(dir)) = (config.vault.as_ref(), path.parent()) {
            if vault.is_relative() {
                config.vault = Some(dir.join(vault));
            }
        }
        Ok(config)
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(mut self, vault: Option<PathBuf>, cycle_note: Option<String>) -> Self {
        if vault.is_some() {
            self.vault = vault;
        }
        if cycle_note.is_some() {
            self.cycle_note = cycle_note;
        }
        self
    }

    pub fn validate(&self) -> Result<(), OkrError> {
        if self.vault.is_none() {
            return Err(OkrError::config(
                "No vault configured. Set `vault` in okrtrack.toml or pass --vault.",
            ));
        }
        if self.daily_note_format.trim().is_empty() {
            return Err(OkrError::config("daily_note_format must not be empty"));
        }
        for habit in &self.habits {
            if habit.criteria == Criteria::StoryPoints {
                return Err(OkrError::config(format!(
                    "Habit '{}' cannot use story-points criteria",
                    habit.name
                )));
            }
        }
        Ok(())
    }

    pub fn vault_root(&self) -> Result<&Path, OkrError> {
        self.vault
            .as_deref()
            .ok_or_else(|| OkrError::config("No vault configured"))
    }

    pub fn cycle_note(&self) -> Result<&str, OkrError> {
        self.cycle_note.as_deref().ok_or_else(|| {
            OkrError::config("No cycle note configured. Set `cycle_note` or pass --cycle.")
        })
    }
}
