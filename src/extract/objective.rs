use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::OkrError;
use crate::extract::fields;
use crate::models::{CriteriaVocabulary, Element, KeyResult, Objective};

static OBJECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(O\d+):(.+)$").expect("valid objective regex"));

static KEY_RESULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(O\d+)\s+(KR\d+):(.+)$").expect("valid key result regex"));

/// Read objectives (`# O1: ...`) and key results (`### O1 KR1: ...`) from a
/// cycle note. Each key result heading must be followed by a block carrying
/// `[criteria:: ...]`, optionally `[target:: ...]` and `(keywords:: [...])`.
pub fn parse_objectives(
    doc: &Element,
    note: &str,
    vocabulary: &CriteriaVocabulary,
) -> Result<Vec<Objective>, OkrError> {
    let mut objectives: Vec<Objective> = Vec::new();

    for (i, elem) in doc.children.iter().enumerate() {
        let heading = elem.text.trim();
        match elem.heading_level() {
            Some(1) => {
                if let Some(caps) = OBJECTIVE_RE.captures(heading) {
                    objectives.push(Objective {
                        id: caps[1].to_string(),
                        name: caps[2].trim().to_string(),
                        key_results: Vec::new(),
                    });
                }
            }
            Some(3) => {
                let Some(caps) = KEY_RESULT_RE.captures(heading) else {
                    continue;
                };
                let objective_id = &caps[1];
                let objective = objectives
                    .last_mut()
                    .filter(|o| o.id == objective_id)
                    .ok_or_else(|| OkrError::unknown_objective(heading, objective_id))?;

                let config = doc.children.get(i + 1).map(block_text).unwrap_or_default();
                let kr = key_result(
                    &caps[2],
                    caps[3].trim(),
                    heading,
                    &config,
                    note,
                    vocabulary,
                )?;
                debug!(objective = objective_id, key_result = %kr.id, criteria = kr.criteria.as_str(), "parsed key result");
                objective.key_results.push(kr);
            }
            _ => {}
        }
    }
    Ok(objectives)
}

fn key_result(
    id: &str,
    name: &str,
    heading: &str,
    config: &str,
    note: &str,
    vocabulary: &CriteriaVocabulary,
) -> Result<KeyResult, OkrError> {
    let mut criteria = None;
    let mut target = None;
    let mut keywords = None;
    for annotation in fields::annotations(config) {
        match annotation.key.to_ascii_lowercase().as_str() {
            "criteria" => {
                criteria = Some(
                    vocabulary
                        .resolve(&annotation.value)
                        .ok_or_else(|| OkrError::invalid_criteria(heading, &annotation.value))?,
                );
            }
            "target" => {
                let value: f64 = annotation.value.parse().map_err(|_| {
                    OkrError::validation(format!(
                        "Key result '{heading}' has non-numeric target '{}'",
                        annotation.value
                    ))
                    .with_subject(heading)
                })?;
                target = Some(value);
            }
            "keywords" => keywords = Some(fields::parse_list(&annotation.value)),
            _ => {}
        }
    }
    let criteria = criteria.ok_or_else(|| OkrError::missing_criteria(heading))?;

    Ok(KeyResult {
        id: id.to_string(),
        name: name.to_string(),
        criteria,
        target,
        keywords,
        okr_tag: okr_tag(note, heading),
    })
}

/// `[[note#heading]]` with the characters Obsidian drops from heading links removed.
pub fn okr_tag(note: &str, heading: &str) -> String {
    let anchor: String = heading
        .chars()
        .filter(|c| !matches!(c, ':' | '[' | ']' | '#' | '|' | '^'))
        .collect();
    format!("[[{note}#{}]]", fields::collapse_whitespace(&anchor))
}

fn block_text(elem: &Element) -> String {
    let mut parts = vec![elem.text.clone()];
    for child in &elem.children {
        parts.push(block_text(child));
    }
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}
