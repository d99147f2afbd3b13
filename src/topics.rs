/// Fixed vocabulary of profile topics recognized in visitor messages.
const VOCABULARY: &[&str] = &[
    "skills",
    "experience",
    "projects",
    "education",
    "contact",
    "work",
    "background",
    "portfolio",
    "coding",
    "development",
    "design",
    "ai",
    "machine learning",
];

/// Scan a message for vocabulary topics. Case-insensitive whole-word
/// matching; multi-word entries match as a phrase. The result is
/// duplicate-free and in vocabulary order.
pub fn extract_topics(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    VOCABULARY
        .iter()
        .filter(|keyword| contains_whole_word(&lowered, keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Substring match bounded by non-alphanumeric characters on both sides.
/// The vocabulary is ASCII, so byte offsets stay on char boundaries.
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let begin = from + offset;
        let end = begin + needle.len();

        let bounded_left = haystack[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let bounded_right = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());

        if bounded_left && bounded_right {
            return true;
        }
        from = begin + 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_boundaries_are_respected() {
        assert!(contains_whole_word("tell me about ai", "ai"));
        assert!(contains_whole_word("ai first", "ai"));
        assert!(contains_whole_word("is it ai?", "ai"));
        assert!(!contains_whole_word("maintain the code", "ai"));
        assert!(!contains_whole_word("said", "ai"));
    }

    #[test]
    fn later_occurrence_can_still_match() {
        // First hit is embedded, second stands alone.
        assert!(contains_whole_word("networking and work", "work"));
    }
}
