//! Per-user survey state machine.
//!
//! Each user progresses linearly: no session → collecting answer 0..7 →
//! ready for synthesis → no session. The terminal transition always
//! removes the session, whether synthesis later succeeds or fails.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::SurveyError;
use crate::survey::questions::{QUESTION_COUNT, QUESTIONS};

/// Stable numeric identity of a chat user.
pub type UserId = i64;

/// In-progress survey state for one user.
///
/// Invariant: `answers.len() == question_index`, and the index is always
/// in `[0, QUESTION_COUNT]`.
#[derive(Debug, Default)]
struct Session {
    answers: Vec<String>,
    question_index: usize,
}

/// Outcome of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyStep {
    /// Ask the user the next question.
    Ask(&'static str),
    /// All questions answered; the session has been removed and the
    /// collected answers are ready for synthesis.
    Complete(Vec<String>),
}

/// Tracks every user's survey progress in memory.
///
/// The map lives behind a mutex so the dispatch layer can handle each
/// inbound message on its own task; the lock is only held for the state
/// transition, never across a network call.
#[derive(Debug, Default)]
pub struct SurveyTracker {
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl SurveyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a survey for a user, discarding any prior
    /// answers. Returns the first question.
    pub fn reset(&self, user_id: UserId) -> &'static str {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        sessions.insert(user_id, Session::default());
        tracing::debug!(user_id, "survey session reset");
        QUESTIONS[0]
    }

    /// Record one answer for a user.
    ///
    /// Fails with `NoActiveSession` (and mutates nothing) if the user
    /// never sent the reset command. Once the seventh answer lands the
    /// session is removed and its answers returned.
    pub fn submit_answer(
        &self,
        user_id: UserId,
        text: &str,
    ) -> Result<SurveyStep, SurveyError> {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        let session = sessions
            .get_mut(&user_id)
            .ok_or(SurveyError::NoActiveSession { user_id })?;

        session.answers.push(text.to_string());
        session.question_index += 1;
        debug_assert_eq!(session.answers.len(), session.question_index);

        if session.question_index < QUESTION_COUNT {
            Ok(SurveyStep::Ask(QUESTIONS[session.question_index]))
        } else {
            let answers = std::mem::take(&mut session.answers);
            sessions.remove(&user_id);
            tracing::debug!(user_id, "survey complete, session removed");
            Ok(SurveyStep::Complete(answers))
        }
    }

    /// Whether a user currently has a survey in progress.
    pub fn has_session(&self, user_id: UserId) -> bool {
        self.sessions
            .lock()
            .expect("session map poisoned")
            .contains_key(&user_id)
    }
}
