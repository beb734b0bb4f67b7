pub mod daily;
pub mod habit;
pub mod score;

use serde::Serialize;

use crate::error::OkrError;

/// A note left out of a run, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteFailure {
    pub note: String,
    pub code: String,
    pub message: String,
}

impl NoteFailure {
    pub fn new(note: &str, err: &OkrError) -> Self {
        Self {
            note: note.to_string(),
            code: err.code.as_str().to_string(),
            message: err.message.clone(),
        }
    }
}
