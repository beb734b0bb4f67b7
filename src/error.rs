use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AmbiguousTaskType,
    MissingCriteria,
    InvalidCriteria,
    UnknownObjective,
    NoteNotFound,
    UnreadableNote,
    InvalidFrontMatter,
    ConfigError,
    ValidationError,
    IoError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmbiguousTaskType => "AMBIGUOUS_TASK_TYPE",
            Self::MissingCriteria => "MISSING_CRITERIA",
            Self::InvalidCriteria => "INVALID_CRITERIA",
            Self::UnknownObjective => "UNKNOWN_OBJECTIVE",
            Self::NoteNotFound => "NOTE_NOT_FOUND",
            Self::UnreadableNote => "UNREADABLE_NOTE",
            Self::InvalidFrontMatter => "INVALID_FRONT_MATTER",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }

    /// Errors scoped to a single note. The pipeline records these and moves on
    /// to the next note; everything else aborts the run.
    pub fn is_note_level(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousTaskType | Self::NoteNotFound | Self::UnreadableNote
        )
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct OkrError {
    pub code: ErrorCode,
    pub message: String,
    /// The offending input (raw task text, heading, note name) when there is one.
    pub subject: Option<String>,
}

impl OkrError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn ambiguous_task_type(raw_text: &str, types: &[&str]) -> Self {
        Self::new(
            ErrorCode::AmbiguousTaskType,
            format!(
                "Multiple task types found ({}) in: {}",
                types.join(", "),
                raw_text.trim()
            ),
        )
        .with_subject(raw_text)
    }

    pub fn missing_criteria(heading: &str) -> Self {
        Self::new(
            ErrorCode::MissingCriteria,
            format!("Key result '{heading}' has no [criteria::...] annotation"),
        )
        .with_subject(heading)
    }

    pub fn invalid_criteria(heading: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidCriteria,
            format!("Key result '{heading}' has unknown criteria '{value}'"),
        )
        .with_subject(heading)
    }

    pub fn unknown_objective(heading: &str, objective: &str) -> Self {
        Self::new(
            ErrorCode::UnknownObjective,
            format!("Key result '{heading}' is not under a heading for objective {objective}"),
        )
        .with_subject(heading)
    }

    pub fn note_not_found(name: &str) -> Self {
        Self::new(ErrorCode::NoteNotFound, format!("Note not found: {name}")).with_subject(name)
    }

    pub fn unreadable_note(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::UnreadableNote, format!("Cannot read note '{name}': {reason}"))
            .with_subject(name)
    }

    pub fn invalid_front_matter(name: &str, message: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidFrontMatter,
            format!("Invalid front matter in '{name}': {message}"),
        )
        .with_subject(name)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }
}

impl From<std::io::Error> for OkrError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e.to_string())
    }
}

impl From<toml::de::Error> for OkrError {
    fn from(e: toml::de::Error) -> Self {
        Self::config(e.to_string())
    }
}

impl From<serde_yaml::Error> for OkrError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::new(ErrorCode::InvalidFrontMatter, format!("Invalid front matter: {e}"))
    }
}

impl From<walkdir::Error> for OkrError {
    fn from(e: walkdir::Error) -> Self {
        Self::io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_level_codes() {
        assert!(ErrorCode::AmbiguousTaskType.is_note_level());
        assert!(ErrorCode::NoteNotFound.is_note_level());
        assert!(ErrorCode::UnreadableNote.is_note_level());
        assert!(!ErrorCode::MissingCriteria.is_note_level());
        assert!(!ErrorCode::IoError.is_note_level());
    }

    #[test]
    fn test_yaml_error_converts_to_front_matter_code() {
        let err: OkrError = serde_yaml::from_str::<serde_yaml::Value>("a: [1, 2")
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::InvalidFrontMatter);
        assert_eq!(err.code.as_str(), "INVALID_FRONT_MATTER");
        assert!(err.message.starts_with("Invalid front matter:"));
    }
}
