//! Inline annotation grammars shared by the task and objective parsers.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::models::{DateKind, Priority};

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%.*?%%").expect("valid comment regex"));

static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*)\]\([^()\s]*\)").expect("valid link regex"));

static OKR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*okr::\s*((?:\[\[[^\]]*\]\]|[^()\[\]])*?)\s*\)").expect("valid okr regex")
});

static BRACKET_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]():]+)::\s*((?:\[\[[^\]]*\]\]|[^\[\]])*?)\s*\]")
        .expect("valid field regex")
});

static PAREN_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([^\[\]():]+)::\s*((?:\[\[[^\]]*\]\]|\[[^\]]*\]|[^()\[\]])*?)\s*\)")
        .expect("valid field regex")
});

const EMPHASIS: [&str; 5] = ["**", "__", "~~", "==", "`"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub key: String,
    pub value: String,
}

/// Reduce an item's inline markdown to the text a reader sees: emphasis
/// markers and `[text](url)` link targets go, wiki links stay, and `%%...%%`
/// comments are dropped.
pub fn plain_text(inline: &str) -> String {
    let mut text = MD_LINK_RE.replace_all(inline, "$1").into_owned();
    for marker in EMPHASIS {
        text = text.replace(marker, "");
    }
    COMMENT_RE.replace_all(&text, "").into_owned()
}

/// Whitespace-delimited `#tag` tokens, prefix stripped, in order, duplicates kept.
pub fn tags(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|w| w.starts_with('#'))
        .map(|w| w.trim_matches('#').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn strip_tags(text: &str) -> String {
    text.split_whitespace()
        .filter(|w| !(w.starts_with('#') && w.len() > 1))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Default, PartialEq)]
pub struct Glyphs {
    pub priority: Option<Priority>,
    pub dates: BTreeMap<DateKind, NaiveDate>,
    pub rest: String,
}

/// Pull priority and date emoji out of `text`. A date glyph consumes the next
/// token when it parses as `YYYY-MM-DD`; otherwise only the glyph is dropped.
pub fn take_glyphs(text: &str) -> Glyphs {
    let mut glyphs = Glyphs::default();
    let mut rest = Vec::new();
    let mut tokens = text.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        let bare = token.trim_end_matches('\u{fe0f}');
        if let Some(priority) = Priority::from_glyph(bare) {
            glyphs.priority.get_or_insert(priority);
            continue;
        }
        if let Some(kind) = DateKind::from_glyph(bare) {
            match tokens
                .peek()
                .and_then(|next| NaiveDate::parse_from_str(next, "%Y-%m-%d").ok())
            {
                Some(date) => {
                    glyphs.dates.entry(kind).or_insert(date);
                    tokens.next();
                }
                None => debug!(glyph = bare, "date glyph without a valid date"),
            }
            continue;
        }
        rest.push(token);
    }
    glyphs.rest = rest.join(" ");
    glyphs
}

/// Remove the first `(okr:: ...)` annotation, returning its value.
pub fn take_okr(text: &str) -> (String, Option<String>) {
    match OKR_RE.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let value = caps[1].trim().to_string();
            let mut rest = String::with_capacity(text.len());
            rest.push_str(&text[..whole.start]);
            rest.push(' ');
            rest.push_str(&text[whole.end..]);
            (rest, Some(value).filter(|v| !v.is_empty()))
        }
        None => (text.to_string(), None),
    }
}

/// Remove every `[key::value]` and `(key::value)` annotation, in order of appearance.
pub fn take_annotations(text: &str) -> (String, Vec<Annotation>) {
    let mut found: Vec<(usize, Annotation)> = Vec::new();
    for re in [&*BRACKET_FIELD_RE, &*PAREN_FIELD_RE] {
        for caps in re.captures_iter(text) {
            let start = caps.get(0).map_or(0, |m| m.start());
            found.push((
                start,
                Annotation {
                    key: caps[1].trim().to_string(),
                    value: caps[2].trim().to_string(),
                },
            ));
        }
    }
    found.sort_by_key(|(start, _)| *start);

    let rest = BRACKET_FIELD_RE.replace_all(text, " ");
    let rest = PAREN_FIELD_RE.replace_all(&rest, " ").into_owned();
    (rest, found.into_iter().map(|(_, a)| a).collect())
}

pub fn annotations(text: &str) -> Vec<Annotation> {
    take_annotations(text).1
}

/// Parse a literal list such as `["gym", 'run', swim]`.
pub fn parse_list(value: &str) -> Vec<String> {
    let inner = value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    inner
        .split(',')
        .map(|s| s.trim().trim_matches(|c: char| c == '"' || c == '\'').trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
