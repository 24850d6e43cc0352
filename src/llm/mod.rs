//! Persona synthesis via the GigaChat inference provider.
//!
//! The dispatcher depends only on the [`PersonaSynthesizer`] trait; the
//! GigaChat HTTP client lives behind it so the conversation flow can be
//! tested with a stub.

pub mod gigachat;
pub mod prompt;

pub use gigachat::GigaChatClient;
pub use prompt::build_persona_prompt;

use async_trait::async_trait;

/// Turns a completed set of survey answers into persona text.
///
/// Implementations convert every provider failure into a human-readable
/// string at this boundary: the return value is always the final
/// user-visible reply, never an error to handle upstream.
#[async_trait]
pub trait PersonaSynthesizer: Send + Sync {
    async fn synthesize(&self, answers: &[String]) -> String;
}
