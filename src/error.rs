//! Error types for the persona bot.

/// Top-level error type.
///
/// `SurveyError` is deliberately absent: the dispatcher consumes it
/// (turning `NoActiveSession` into a hint reply) and it never needs to
/// escape to callers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send response on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },
}

/// Survey state errors.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// The user sent an answer without an in-progress survey.
    #[error("No active survey session for user {user_id}")]
    NoActiveSession { user_id: i64 },
}

/// GigaChat provider errors.
///
/// These never cross the synthesizer boundary: the `PersonaSynthesizer`
/// implementation converts them to user-visible text.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Token acquisition failed: {reason}")]
    TokenAcquisition { reason: String },

    #[error("Completion request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Invalid response from provider: {reason}")]
    InvalidResponse { reason: String },
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
