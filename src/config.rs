use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

/// Top-level configuration loaded from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub gateway: GatewayConfig,
    pub model: ModelConfig,
    pub chat: ChatConfig,
    pub profile: ProfileConfig,
}

#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

fn default_port() -> u16 {
    8000
}
fn default_bind() -> String {
    "127.0.0.1".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
        }
    }
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Most recent messages sent along as model context.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Conversations idle longer than this are eligible for eviction.
    #[serde(default = "default_session_timeout")]
    pub session_timeout_minutes: u64,
    /// How often the background eviction sweep runs.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            session_timeout_minutes: default_session_timeout(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_history_limit() -> usize {
    20
}
fn default_session_timeout() -> u64 {
    30
}
fn default_sweep_interval() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_profile_path")]
    pub path: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            path: default_profile_path(),
        }
    }
}

fn default_profile_path() -> String {
    "profile.json".into()
}

/// Load configuration from file or use defaults.
///
/// Search order:
/// 1. `PORTFOLIO_CHAT_CONFIG` env var
/// 2. `~/.portfolio-chat/config.toml`
/// 3. Zero-config defaults (no file needed)
///
/// The model API key is required either way: a config with no key is a
/// startup error, never a silently substituted placeholder.
pub fn load() -> anyhow::Result<PortfolioConfig> {
    let path = config_path();

    let mut config = if path.exists() {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        let config: PortfolioConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;
        info!("loaded config from {}", path.display());
        config
    } else {
        info!("no config file found, using zero-config defaults");
        PortfolioConfig::default()
    };

    resolve_api_key(&mut config);
    validate(&config)?;
    Ok(config)
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("PORTFOLIO_CHAT_CONFIG") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".portfolio-chat").join("config.toml")
}

/// Resolve the API key from environment variables if not set in config.
fn resolve_api_key(config: &mut PortfolioConfig) {
    if config.model.api_key.is_none() {
        config.model.api_key = match config.model.provider.as_str() {
            "gemini" => std::env::var("GEMINI_API_KEY").ok(),
            "openai" => std::env::var("OPENAI_API_KEY").ok(),
            _ => None,
        };
    }
}

/// Validate the config and return clear error messages.
pub fn validate(config: &PortfolioConfig) -> anyhow::Result<()> {
    let valid_providers = ["gemini", "openai"];
    if !valid_providers.contains(&config.model.provider.as_str()) {
        anyhow::bail!(
            "invalid provider '{}': must be one of {:?}",
            config.model.provider,
            valid_providers
        );
    }

    if config.model.api_key.is_none() {
        anyhow::bail!(
            "no API key for provider '{}'. Set {} or model.api_key in the config file.",
            config.model.provider,
            match config.model.provider.as_str() {
                "gemini" => "GEMINI_API_KEY",
                "openai" => "OPENAI_API_KEY",
                _ => "the appropriate API key",
            }
        );
    }

    if config.chat.history_limit == 0 {
        anyhow::bail!("chat.history_limit must be > 0");
    }

    if config.chat.session_timeout_minutes == 0 {
        anyhow::bail!("chat.session_timeout_minutes must be > 0");
    }

    if config.chat.sweep_interval_secs == 0 {
        anyhow::bail!("chat.sweep_interval_secs must be > 0");
    }

    Ok(())
}
