//! Persona Bot — survey-driven customer persona synthesis over chat.

pub mod bot;
pub mod channels;
pub mod config;
pub mod error;
pub mod llm;
pub mod survey;
