//! Outcome classification for conversational turns.
//!
//! Classifies free-form assistant text into [`Outcome::Success`],
//! [`Outcome::Error`] or [`Outcome::None`] using ordered pattern tables.
//! The error table is always consulted first: text matching both an error
//! and a success pattern is reported as an error, so ambiguous turns like
//! "fixed the error, all set!" never read as success.
//!
//! Patterns are compiled once via [`LazyLock`]; classification is a pure
//! function with no state.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Outcome;

/// Texts shorter than this are never classified.
pub const MIN_CLASSIFIABLE_CHARS: usize = 10;

/// Failure vocabulary. Any match means the turn is an error; table order
/// carries no meaning beyond grouping the literal phrases first.
static ERROR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)should we try to fix this problem\?",
        r"(?i)potential problem detected",
        r"(?i)\berror\s+(occurred|detected|found)",
        r"(?i)\bfailed\s+to\s+(create|build|deploy|install|load)",
        r"(?i)\bsomething\s+went\s+wrong",
        r"(?i)\bthere\s+was\s+an?\s+(error|issue|problem)",
        r"(?i)\bunable\s+to\s+(connect|access|load|create)",
        r"(?i)\bconnection\s+(failed|error|timeout)",
        r"(?i)\bbuild\s+(failed|error)",
        r"(?i)\bdeployment\s+(failed|error)",
        r"(?i)\binstallation\s+(failed|error)",
        r"(?i)\btimeout\s+(error|occurred)",
        r"(?i)\bnetwork\s+(error|issue)",
        r"(?i)\bpermission\s+(denied|error)",
        r"(?i)\bfile\s+not\s+found",
        r"(?i)\bmodule\s+not\s+found",
        r"(?i)\bsyntax\s+error",
        r"(?i)\breference\s+error",
        r"(?i)\btype\s+error",
        r"(?i)\b(fixed|resolved)\s+(the\s+|an?\s+)?(error|issue|problem|bug)s?\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("error pattern must compile"))
    .collect()
});

/// High-confidence completion forms: "I've" followed by a completion verb.
static COMPLETION_PRIMARY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bi've\s+(created|updated|implemented|added|built|set up|configured|fixed|modified|established|deployed|successfully)",
        r"(?i)\bi've\s+(now|just|already)\s+(created|updated|implemented|added|built)",
        r"(?i)\bi've\s+(made|completed|finished)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("completion pattern must compile"))
    .collect()
});

/// Secondary completion vocabulary, checked after the primary forms.
static COMPLETION_SECONDARY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(perfect|great|excellent)!\s+(i've|now)",
        r"(?i)\b(changes|improvements|updates)\s+(made|completed)",
        r"(?i)\b(task|implementation|setup|configuration|deployment)\s+(complete|completed|finished|done)",
        r"(?i)\b(successfully|now)\s+(created|implemented|deployed|built|added)",
        r"(?i)\bdeployment\s+(successful|complete|finished)",
        r"(?i)\bsite\s+is\s+(live|deployed|ready)",
        r"(?i)\bbuild\s+(successful|complete|finished)",
        r"(?i)\ball\s+set!",
        r"(?i)\bready\s+to\s+(go|use)",
        r"(?i)\bproject\s+is\s+(ready|complete)",
        r"(?i)\bperfect!",
        r"(?i)\bexcellent!",
        r"(?i)\bgreat!",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("completion pattern must compile"))
    .collect()
});

/// Classifies a conversational turn.
///
/// Error patterns are checked before success patterns; a text matching both
/// tables is reported as [`Outcome::Error`]. Texts shorter than
/// [`MIN_CLASSIFIABLE_CHARS`] are [`Outcome::None`].
#[must_use]
pub fn classify(text: &str) -> Outcome {
    if text.chars().count() < MIN_CLASSIFIABLE_CHARS {
        return Outcome::None;
    }

    if matches_any(&ERROR_PATTERNS, text) {
        return Outcome::Error;
    }
    if matches_any(&COMPLETION_PRIMARY, text) || matches_any(&COMPLETION_SECONDARY, text) {
        return Outcome::Success;
    }

    Outcome::None
}

fn matches_any(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(text))
}
