use portfolio_chat::model::APOLOGY;
use portfolio_chat::model::postprocess::{
    NEGATIVE_MARKERS, SUBSTITUTIONS, apply_substitutions, classify_sentiment,
};
use portfolio_chat::types::Sentiment;

#[test]
fn third_person_possessive_is_rewritten() {
    let cleaned = apply_substitutions("The portfolio owner's projects include a chat daemon.");
    assert_eq!(cleaned, "My projects include a chat daemon.");
}

#[test]
fn owner_rules_run_before_the_bare_portfolio_rule() {
    // "portfolio owner" must be consumed by the earlier rules; otherwise the
    // later portfolio->profile rule would leave "profile owner" behind.
    let cleaned = apply_substitutions("Ask the portfolio owner about the portfolio.");
    assert_eq!(cleaned, "Ask I about the profile.");
    assert!(!cleaned.contains("profile owner"));
}

#[test]
fn ai_assistant_rule_runs_before_bare_assistant() {
    let cleaned = apply_substitutions("I am an AI assistant, not just an assistant.");
    assert!(!cleaned.contains("assistant"));
}

#[test]
fn meta_phrases_are_stripped() {
    let cleaned = apply_substitutions("I am a digital representation of a developer.");
    assert!(!cleaned.contains("digital representation"));
}

#[test]
fn untouched_text_passes_through() {
    let text = "I build backends in Rust and enjoy systems work.";
    assert_eq!(apply_substitutions(text), text);
}

#[test]
fn table_order_is_most_specific_first() {
    // Guard against reorderings that would break the interactions above.
    let owner = SUBSTITUTIONS
        .iter()
        .position(|(from, _)| *from == "the portfolio owner")
        .expect("owner rule present");
    let portfolio = SUBSTITUTIONS
        .iter()
        .position(|(from, _)| *from == "portfolio")
        .expect("portfolio rule present");
    assert!(owner < portfolio);
}

#[test]
fn negative_marker_flips_sentiment() {
    assert_eq!(
        classify_sentiment("I cannot share that."),
        Sentiment::Negative
    );
    assert_eq!(classify_sentiment("Unfortunately, no."), Sentiment::Negative);
    assert_eq!(classify_sentiment("Bohužel to nevím."), Sentiment::Negative);
}

#[test]
fn clean_reply_reads_positive() {
    assert_eq!(
        classify_sentiment("I love building web apps in Rust."),
        Sentiment::Positive
    );
    assert_eq!(classify_sentiment(""), Sentiment::Positive);
}

#[test]
fn apology_reads_negative() {
    assert!(
        NEGATIVE_MARKERS
            .iter()
            .any(|m| APOLOGY.to_lowercase().contains(m))
    );
    assert_eq!(classify_sentiment(APOLOGY), Sentiment::Negative);
}
