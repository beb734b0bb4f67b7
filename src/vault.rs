use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::OkrError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrontMatter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

/// Markdown notes under a root directory, addressed by file stem.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    index: BTreeMap<String, PathBuf>,
}

impl Vault {
    pub fn open(root: &Path) -> Result<Self, OkrError> {
        if !root.is_dir() {
            return Err(OkrError::config(format!(
                "Vault directory does not exist: {}",
                root.display()
            )));
        }
        let mut files: Vec<PathBuf> = Vec::new();
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "md") {
                files.push(path.strip_prefix(root).unwrap_or(path).to_path_buf());
            }
        }
        files.sort();

        let mut index: BTreeMap<String, PathBuf> = BTreeMap::new();
        for rel in files {
            let Some(name) = rel.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if let Some(existing) = index.get(&name) {
                warn!(note = %name, kept = %existing.display(), skipped = %rel.display(), "duplicate note name");
                continue;
            }
            index.insert(name, rel);
        }
        debug!(root = %root.display(), notes = index.len(), "indexed vault");
        Ok(Self {
            root: root.to_path_buf(),
            index,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn note_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    /// Absolute path of a note.
    pub fn path(&self, name: &str) -> Result<PathBuf, OkrError> {
        self.index
            .get(name)
            .map(|rel| self.root.join(rel))
            .ok_or_else(|| OkrError::note_not_found(name))
    }

    /// Raw note text. Failing to read or decode a note is scoped to that note.
    pub fn read(&self, name: &str) -> Result<String, OkrError> {
        let path = self.path(name)?;
        let bytes = fs::read(&path).map_err(|e| OkrError::unreadable_note(name, e))?;
        String::from_utf8(bytes).map_err(|e| OkrError::unreadable_note(name, e))
    }

    /// Note text with the front matter block removed.
    pub fn source_text(&self, name: &str) -> Result<String, OkrError> {
        let text = self.read(name)?;
        Ok(split_front_matter(&text).1.to_string())
    }

    pub fn front_matter(&self, name: &str) -> Result<FrontMatter, OkrError> {
        let text = self.read(name)?;
        match split_front_matter(&text).0 {
            Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)
                .map_err(|e| OkrError::invalid_front_matter(name, e)),
            _ => Ok(FrontMatter::default()),
        }
    }

    /// Names of notes stored under `dir` (relative to the vault root).
    pub fn notes_under(&self, dir: &Path) -> Vec<String> {
        self.index
            .iter()
            .filter(|(_, rel)| rel.starts_with(dir))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Split `---` delimited YAML front matter from the body.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, text)
}
