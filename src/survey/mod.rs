//! Survey flow — the fixed question set and the per-user tracker.

pub mod questions;
pub mod tracker;

pub use questions::{QUESTION_COUNT, QUESTIONS};
pub use tracker::{SurveyStep, SurveyTracker, UserId};
