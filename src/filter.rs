//! Text filter separating conversational messages from UI chrome.
//!
//! The live page mixes genuine assistant turns with navigation chrome, token
//! counters, marketing banners and preview placeholders. This filter is the
//! first gate every scanned node passes through: it rejects obvious chrome and
//! accepts only text that reads like part of a conversation.

/// Minimum character count for a fragment to be considered at all.
pub const MIN_CONVERSATIONAL_CHARS: usize = 20;

/// Phrases that identify UI chrome rather than conversation.
const CHROME_PHRASES: &[&str] = &[
    "subscribe to pro",
    "monthly tokens",
    "waiting for preview",
    "help center",
    "join our community",
    "your preview will appear",
];

/// Markers that identify conversational content: first-person narration,
/// task-completion vocabulary, and referential phrases.
const CONVERSATION_MARKERS: &[&str] = &[
    "i'll",
    "i've",
    "let me",
    "here's",
    "i can",
    "i will",
    "created",
    "updated",
    "implemented",
    "added",
    "built",
    "the project",
    "the application",
    "the component",
    "now you can",
    "you should see",
    "this will",
];

/// Returns true if the fragment looks like a conversational message rather
/// than UI chrome.
///
/// Rejects text shorter than 20 characters, purely numeric text, and anything
/// containing a chrome phrase. Accepts only if at least one conversation
/// marker is present. Matching is case-insensitive; no side effects.
#[must_use]
pub fn is_conversational(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_CONVERSATIONAL_CHARS {
        return false;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let lowered = trimmed.to_lowercase();
    if CHROME_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
        return false;
    }

    CONVERSATION_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_rejected_even_with_markers() {
        // Below the 20-character floor, content is irrelevant.
        assert!(!is_conversational("I've built it"));
        assert!(!is_conversational("Build failed."));
        assert!(!is_conversational(""));
    }

    #[test]
    fn purely_numeric_text_is_rejected() {
        assert!(!is_conversational("123456789012345678901234567890"));
    }

    #[test]
    fn chrome_phrases_are_rejected_regardless_of_markers() {
        assert!(!is_conversational(
            "Subscribe to Pro to get more monthly tokens for the project"
        ));
        assert!(!is_conversational(
            "Waiting for preview... your preview will appear here shortly"
        ));
        assert!(!is_conversational(
            "Visit the Help Center or join our community for support"
        ));
    }

    #[test]
    fn conversational_first_person_is_accepted() {
        assert!(is_conversational(
            "I'll start by setting up the routing for your pages."
        ));
        assert!(is_conversational(
            "Let me walk you through what changed in this revision."
        ));
        assert!(is_conversational(
            "Here's an overview of the folder structure we ended up with."
        ));
    }

    #[test]
    fn completion_vocabulary_is_accepted() {
        assert!(is_conversational(
            "The navigation bar was implemented with sticky positioning."
        ));
        assert!(is_conversational(
            "A dark mode toggle was added near the profile menu."
        ));
    }

    #[test]
    fn referential_phrases_are_accepted() {
        assert!(is_conversational(
            "Now you can drag cards between columns on the board."
        ));
        assert!(is_conversational(
            "You should see the updated layout after a refresh."
        ));
    }

    #[test]
    fn long_text_without_markers_is_rejected() {
        assert!(!is_conversational(
            "Terms of service and privacy policy for all registered users."
        ));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(is_conversational(
            "NOW YOU CAN VIEW THE DASHBOARD FROM THE HOME SCREEN."
        ));
        assert!(!is_conversational("SUBSCRIBE TO PRO for the project today"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(is_conversational(
            "   I've updated the color palette across all pages.   "
        ));
    }
}
