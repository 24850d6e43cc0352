//! Configuration — everything comes from the process environment.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// GigaChat OAuth endpoint (production).
pub const DEFAULT_TOKEN_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
/// GigaChat chat-completions endpoint (production).
pub const DEFAULT_COMPLETIONS_URL: &str =
    "https://gigachat.devices.sberbank.ru/api/v1/chat/completions";

/// Permission scope requested on every token exchange.
pub const GIGACHAT_SCOPE: &str = "GIGACHAT_API_PERS";

/// Bot configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token. Absent means the bot runs on the CLI channel.
    pub telegram_token: Option<String>,
    /// Telegram usernames / numeric ids allowed to talk to the bot.
    /// `*` means everyone.
    pub allowed_users: Vec<String>,
    /// GigaChat settings.
    pub gigachat: GigaChatConfig,
}

/// GigaChat provider configuration.
#[derive(Debug, Clone)]
pub struct GigaChatConfig {
    /// Basic-auth key for the OAuth endpoint.
    pub auth_key: SecretString,
    /// Client id issued by the provider. Loaded for completeness; the
    /// call path does not use it.
    pub client_id: Option<String>,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// OAuth endpoint URL.
    pub token_url: String,
    /// Chat-completions endpoint URL.
    pub completions_url: String,
    /// Timeout for the token exchange.
    pub token_timeout: Duration,
    /// Timeout for the completion request.
    pub completion_timeout: Duration,
    /// Skip TLS certificate verification on provider calls. Off by
    /// default; only for environments using the provider's private CA.
    pub insecure_tls: bool,
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// `GIGACHAT_AUTH_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let auth_key = std::env::var("GIGACHAT_AUTH_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("GIGACHAT_AUTH_KEY".into()))?;

        let allowed_users: Vec<String> = std::env::var("TELEGRAM_ALLOWED_USERS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let insecure_tls = matches!(
            std::env::var("GIGACHAT_INSECURE_TLS").as_deref(),
            Ok("1") | Ok("true") | Ok("yes")
        );

        Ok(Self {
            telegram_token: std::env::var("TELEGRAM_TOKEN").ok(),
            allowed_users,
            gigachat: GigaChatConfig {
                auth_key: SecretString::from(auth_key),
                client_id: std::env::var("GIGACHAT_CLIENT_ID").ok(),
                model: std::env::var("GIGACHAT_MODEL")
                    .unwrap_or_else(|_| "GigaChat".to_string()),
                temperature: 0.7,
                token_url: DEFAULT_TOKEN_URL.to_string(),
                completions_url: DEFAULT_COMPLETIONS_URL.to_string(),
                token_timeout: Duration::from_secs(30),
                completion_timeout: Duration::from_secs(90),
                insecure_tls,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_gigachat_config() -> GigaChatConfig {
        GigaChatConfig {
            auth_key: SecretString::from("test-key"),
            client_id: None,
            model: "GigaChat".to_string(),
            temperature: 0.7,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            completions_url: DEFAULT_COMPLETIONS_URL.to_string(),
            token_timeout: Duration::from_secs(30),
            completion_timeout: Duration::from_secs(90),
            insecure_tls: false,
        }
    }

    #[test]
    fn defaults_point_at_production_endpoints() {
        let cfg = test_gigachat_config();
        assert!(cfg.token_url.ends_with("/api/v2/oauth"));
        assert!(cfg.completions_url.ends_with("/api/v1/chat/completions"));
        assert!(!cfg.insecure_tls);
    }

    #[test]
    fn temperature_is_fixed() {
        let cfg = test_gigachat_config();
        assert_eq!(cfg.temperature, 0.7);
    }
}
