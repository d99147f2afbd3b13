use async_trait::async_trait;
use reqwest::Client;

use crate::config::ModelConfig;
use crate::types::{Message, Role};

/// Trait for hosted chat-completion providers. One blocking round-trip per
/// call; streaming is out of scope for this surface. Implementations own
/// the translation of stored history into their wire format.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[Message],
        message: &str,
    ) -> anyhow::Result<String>;
}

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    fn api_url(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[Message],
        message: &str,
    ) -> anyhow::Result<String> {
        // Gemini's non-user role is "model"; anything unrecognized lands
        // there too.
        let mut contents: Vec<serde_json::Value> = history
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    _ => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": m.content }],
                })
            })
            .collect();
        contents.push(serde_json::json!({
            "role": "user",
            "parts": [{ "text": message }],
        }));

        let body = serde_json::json!({
            "system_instruction": { "parts": [{ "text": system_prompt }] },
            "contents": contents,
        });

        let response = self
            .client
            .post(self.api_url())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("gemini API error {status}: {text}");
        }

        let parsed: serde_json::Value = response.json().await?;
        let reply = parsed
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| anyhow::anyhow!("gemini response contained no text"))?;

        Ok(reply)
    }
}

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[Message],
        message: &str,
    ) -> anyhow::Result<String> {
        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": system_prompt,
        })];
        for m in history {
            messages.push(serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            }));
        }
        messages.push(serde_json::json!({
            "role": "user",
            "content": message,
        }));

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("openai API error {status}: {text}");
        }

        let parsed: serde_json::Value = response.json().await?;
        let reply = parsed
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| anyhow::anyhow!("openai response contained no text"))?;

        Ok(reply.to_string())
    }
}

/// Create a provider from config.
pub fn from_config(config: &ModelConfig) -> anyhow::Result<Box<dyn ModelProvider>> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "no API key for provider '{}'. Set {} env var.",
            config.provider,
            match config.provider.as_str() {
                "gemini" => "GEMINI_API_KEY",
                "openai" => "OPENAI_API_KEY",
                _ => "the appropriate API key",
            }
        )
    })?;

    match config.provider.as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(
            api_key,
            config.model.clone(),
        ))),
        "openai" => Ok(Box::new(OpenAiProvider::new(
            api_key,
            config.model.clone(),
        ))),
        other => anyhow::bail!("unknown provider: {other}"),
    }
}
