use crate::types::Sentiment;

/// Ordered rewrite table applied to every model reply. The persona prompt
/// asks for first-person answers; these rules scrub the third-person and
/// meta phrasings the model still produces sometimes. Applied left to
/// right, so earlier replacements can change what later rules see; the
/// order is part of the contract. In particular the "portfolio owner"
/// rules must consume their text before the bare portfolio rule runs, and
/// "AI assistant" must run before the bare "assistant" rule.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("The portfolio owner's", "My"),
    ("the portfolio owner's", "my"),
    ("The portfolio owner", "I"),
    ("the portfolio owner", "I"),
    ("digital representation", ""),
    ("AI assistant", ""),
    ("assistant", ""),
    ("portfolio", "profile"),
    ("Portfolio", "Profile"),
];

/// Markers that flip a reply's sentiment to negative. Checked as
/// case-insensitive substrings; covers English and Czech since replies
/// follow the visitor's language.
pub const NEGATIVE_MARKERS: &[&str] = &[
    "sorry",
    "unfortunately",
    "cannot",
    "can't",
    "won't",
    "unable",
    "omlouvám",
    "bohužel",
    "nemohu",
    "nemůžu",
];

/// Apply the rewrite table in order.
pub fn apply_substitutions(text: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Keyword-presence tone label. Two-valued: anything without a negative
/// marker reads as positive.
pub fn classify_sentiment(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    if NEGATIVE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        Sentiment::Negative
    } else {
        Sentiment::Positive
    }
}
