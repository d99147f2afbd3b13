pub mod postprocess;
pub mod providers;

use tracing::{debug, warn};

use crate::profile::ProfileDocument;
use crate::prompt::build_system_prompt;
use crate::types::{Message, Sentiment};
use postprocess::{apply_substitutions, classify_sentiment};
use providers::ModelProvider;

/// Reply used when anything below the provider boundary fails. The chat
/// surface never hard-fails; worst case is this text.
pub const APOLOGY: &str =
    "Sorry, I ran into a problem with that one. Could you try asking again in a different way?";

/// A post-processed model reply plus its derived tone label.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    pub sentiment: Sentiment,
}

/// Wraps the hosted chat-completion call: persona prompt in, sanitized reply
/// and sentiment out. One round-trip per turn, no retries.
pub struct ModelGateway {
    provider: Box<dyn ModelProvider>,
    history_limit: usize,
}

impl ModelGateway {
    pub fn new(provider: Box<dyn ModelProvider>, history_limit: usize) -> Self {
        Self {
            provider,
            history_limit,
        }
    }

    /// Run one chat turn. Every failure contacting the provider degrades to
    /// the fixed apology with a negative sentiment; callers never see an
    /// error from this operation.
    pub async fn respond(
        &self,
        message: &str,
        history: &[Message],
        profile: &ProfileDocument,
        topics: &[String],
    ) -> ChatReply {
        let system_prompt = build_system_prompt(profile, topics);
        debug!(chars = system_prompt.len(), prompt = %system_prompt, "assembled system prompt");

        let start = history.len().saturating_sub(self.history_limit);
        let window = &history[start..];

        match self.provider.complete(&system_prompt, window, message).await {
            Ok(reply) => {
                let text = apply_substitutions(&reply);
                let sentiment = classify_sentiment(&text);
                ChatReply { text, sentiment }
            }
            Err(e) => {
                warn!("model call failed, returning degraded reply: {e}");
                ChatReply {
                    text: APOLOGY.to_string(),
                    sentiment: Sentiment::Negative,
                }
            }
        }
    }
}
