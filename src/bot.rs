//! Conversation dispatcher — glues the survey tracker to a channel and
//! the persona synthesizer.

use std::sync::Arc;

use futures::StreamExt;

use crate::channels::{Channel, IncomingMessage, OutgoingResponse, StatusUpdate};
use crate::error::{ChannelError, SurveyError};
use crate::llm::PersonaSynthesizer;
use crate::survey::{SurveyStep, SurveyTracker};

/// Sent together with the first question when a user (re)starts.
const GREETING: &str = "👋 Hi! I'll help you identify your target audience.\n\n\
                        Answer 7 questions and I'll build 5 customer persona profiles for you.";

/// Hint for users who send text without an active survey.
const RESTART_HINT: &str = "Send /start to begin";

/// Progress line shown while the provider round-trip runs.
const ANALYZING_NOTE: &str = "⏳ Analyzing your answers with GigaChat AI...";

/// The survey bot: one tracker, one synthesizer, any channel.
pub struct SurveyBot {
    tracker: SurveyTracker,
    synthesizer: Arc<dyn PersonaSynthesizer>,
}

impl SurveyBot {
    pub fn new(synthesizer: Arc<dyn PersonaSynthesizer>) -> Self {
        Self {
            tracker: SurveyTracker::new(),
            synthesizer,
        }
    }

    /// Handle one inbound message end to end, replying through `channel`.
    ///
    /// The synthesis round-trip happens after the user's session is
    /// already removed; a failure is reported as text and the user must
    /// /start again.
    pub async fn handle_message(
        &self,
        channel: &dyn Channel,
        msg: &IncomingMessage,
    ) -> Result<(), ChannelError> {
        if msg.is_start_command() {
            let first_question = self.tracker.reset(msg.user_id);
            return channel
                .respond(
                    msg,
                    OutgoingResponse::new(format!("{GREETING}\n\n{first_question}")),
                )
                .await;
        }

        // Other commands are not survey answers; drop them silently
        if msg.is_command() {
            tracing::debug!(user_id = msg.user_id, "ignoring unsupported command");
            return Ok(());
        }

        match self.tracker.submit_answer(msg.user_id, &msg.text) {
            Err(SurveyError::NoActiveSession { user_id }) => {
                tracing::debug!(user_id, "answer without active session");
                channel
                    .respond(msg, OutgoingResponse::new(RESTART_HINT))
                    .await
            }
            Ok(SurveyStep::Ask(question)) => {
                channel.respond(msg, OutgoingResponse::new(question)).await
            }
            Ok(SurveyStep::Complete(answers)) => {
                // Best effort; a lost progress note shouldn't abort synthesis
                let _ = channel
                    .send_status(msg, StatusUpdate::Thinking(ANALYZING_NOTE.to_string()))
                    .await;

                let analysis = self.synthesizer.synthesize(&answers).await;
                channel
                    .respond(
                        msg,
                        OutgoingResponse::new(format!("✅ **Analysis results:**\n\n{analysis}")),
                    )
                    .await
            }
        }
    }

    /// Drive the channel's message stream until it ends.
    ///
    /// Every message is handled on its own task so one user's blocking
    /// synthesis round-trip never stalls the others.
    pub async fn run(
        self: Arc<Self>,
        channel: Arc<dyn Channel>,
    ) -> crate::error::Result<()> {
        channel.health_check().await?;
        let mut stream = channel.start().await?;

        while let Some(msg) = stream.next().await {
            let bot = Arc::clone(&self);
            let channel = Arc::clone(&channel);
            tokio::spawn(async move {
                if let Err(e) = bot.handle_message(channel.as_ref(), &msg).await {
                    tracing::error!(
                        user_id = msg.user_id,
                        "failed to handle message: {e}"
                    );
                }
            });
        }

        channel.shutdown().await?;
        Ok(())
    }

    /// Whether a user currently has a survey in progress.
    pub fn has_session(&self, user_id: i64) -> bool {
        self.tracker.has_session(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::channels::MessageStream;
    use crate::survey::QUESTIONS;

    /// Synthesizer stub returning a canned persona list.
    struct StubSynthesizer {
        reply: &'static str,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl StubSynthesizer {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PersonaSynthesizer for StubSynthesizer {
        async fn synthesize(&self, answers: &[String]) -> String {
            self.calls.lock().unwrap().push(answers.to_vec());
            self.reply.to_string()
        }
    }

    /// Channel stub recording every reply.
    #[derive(Default)]
    struct RecordingChannel {
        replies: Mutex<Vec<String>>,
        statuses: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn start(&self) -> Result<MessageStream, ChannelError> {
            Ok(Box::pin(futures::stream::empty()))
        }

        async fn respond(
            &self,
            _msg: &IncomingMessage,
            response: OutgoingResponse,
        ) -> Result<(), ChannelError> {
            self.replies.lock().unwrap().push(response.content);
            Ok(())
        }

        async fn send_status(
            &self,
            _msg: &IncomingMessage,
            status: StatusUpdate,
        ) -> Result<(), ChannelError> {
            let StatusUpdate::Thinking(note) = status;
            self.statuses.lock().unwrap().push(note);
            Ok(())
        }

        async fn health_check(&self) -> Result<(), ChannelError> {
            Ok(())
        }

        async fn shutdown(&self) -> Result<(), ChannelError> {
            Ok(())
        }
    }

    fn msg(user_id: i64, text: &str) -> IncomingMessage {
        IncomingMessage::new("recording", user_id, text)
    }

    #[tokio::test]
    async fn start_replies_with_greeting_and_first_question() {
        let bot = SurveyBot::new(Arc::new(StubSynthesizer::new("unused")));
        let ch = RecordingChannel::default();

        bot.handle_message(&ch, &msg(1, "/start")).await.unwrap();

        let replies = ch.replies.lock().unwrap();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("7 questions"));
        assert!(replies[0].contains(QUESTIONS[0]));
    }

    #[tokio::test]
    async fn answer_without_session_gets_restart_hint() {
        let bot = SurveyBot::new(Arc::new(StubSynthesizer::new("unused")));
        let ch = RecordingChannel::default();

        bot.handle_message(&ch, &msg(1, "hello")).await.unwrap();

        let replies = ch.replies.lock().unwrap();
        assert_eq!(replies.as_slice(), &[RESTART_HINT.to_string()]);
    }

    #[tokio::test]
    async fn full_survey_ends_with_synthesized_personas() {
        let synth = Arc::new(StubSynthesizer::new("Persona list X"));
        let bot = SurveyBot::new(Arc::clone(&synth) as Arc<dyn PersonaSynthesizer>);
        let ch = RecordingChannel::default();

        bot.handle_message(&ch, &msg(42, "/start")).await.unwrap();
        for answer in ["A", "B", "C", "D", "E", "F", "G"] {
            bot.handle_message(&ch, &msg(42, answer)).await.unwrap();
        }

        let replies = ch.replies.lock().unwrap();
        // Greeting + six follow-up questions + final analysis
        assert_eq!(replies.len(), 8);
        for (i, q) in QUESTIONS.iter().enumerate().skip(1) {
            assert_eq!(replies[i], *q);
        }
        let last = replies.last().unwrap();
        assert!(last.contains("Persona list X"));
        assert!(last.contains("Analysis results"));

        // Progress note was emitted and the synthesizer saw the answers
        assert_eq!(ch.statuses.lock().unwrap().len(), 1);
        let calls = synth.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ["A", "B", "C", "D", "E", "F", "G"]);

        // Session is gone; another answer needs /start again
        assert!(!bot.has_session(42));
        drop(replies);
        bot.handle_message(&ch, &msg(42, "H")).await.unwrap();
        assert_eq!(
            ch.replies.lock().unwrap().last().unwrap(),
            &RESTART_HINT.to_string()
        );
    }

    #[tokio::test]
    async fn synthesis_error_text_is_still_delivered() {
        // A synthesizer that reports failure as text, like the GigaChat
        // client does when the provider is unreachable.
        let bot = SurveyBot::new(Arc::new(StubSynthesizer::new(
            "Could not connect to GigaChat. Please try again later.",
        )));
        let ch = RecordingChannel::default();

        bot.handle_message(&ch, &msg(5, "/start")).await.unwrap();
        for answer in ["a", "b", "c", "d", "e", "f", "g"] {
            bot.handle_message(&ch, &msg(5, answer)).await.unwrap();
        }

        let replies = ch.replies.lock().unwrap();
        assert!(replies.last().unwrap().contains("Could not connect"));
        assert!(!bot.has_session(5));
    }

    #[tokio::test]
    async fn non_start_commands_are_not_recorded_as_answers() {
        let synth = Arc::new(StubSynthesizer::new("personas"));
        let bot = SurveyBot::new(Arc::clone(&synth) as Arc<dyn PersonaSynthesizer>);
        let ch = RecordingChannel::default();

        // No session: a stray command gets no reply at all
        bot.handle_message(&ch, &msg(1, "/help")).await.unwrap();
        assert!(ch.replies.lock().unwrap().is_empty());

        // Mid-survey: /help neither consumes an answer nor replies
        bot.handle_message(&ch, &msg(1, "/start")).await.unwrap();
        bot.handle_message(&ch, &msg(1, "/help")).await.unwrap();
        assert_eq!(ch.replies.lock().unwrap().len(), 1);

        for answer in ["A", "B", "C", "D", "E", "F", "G"] {
            bot.handle_message(&ch, &msg(1, answer)).await.unwrap();
        }
        let calls = synth.calls.lock().unwrap();
        assert_eq!(calls[0], ["A", "B", "C", "D", "E", "F", "G"]);
    }

    #[tokio::test]
    async fn restart_mid_survey_begins_over() {
        let bot = SurveyBot::new(Arc::new(StubSynthesizer::new("unused")));
        let ch = RecordingChannel::default();

        bot.handle_message(&ch, &msg(1, "/start")).await.unwrap();
        bot.handle_message(&ch, &msg(1, "first answer")).await.unwrap();
        bot.handle_message(&ch, &msg(1, "/start")).await.unwrap();

        let replies = ch.replies.lock().unwrap();
        assert!(replies.last().unwrap().contains(QUESTIONS[0]));
    }

    #[tokio::test]
    async fn two_users_interleave_without_cross_talk() {
        let synth = Arc::new(StubSynthesizer::new("personas"));
        let bot = SurveyBot::new(Arc::clone(&synth) as Arc<dyn PersonaSynthesizer>);
        let ch = RecordingChannel::default();

        bot.handle_message(&ch, &msg(1, "/start")).await.unwrap();
        bot.handle_message(&ch, &msg(2, "/start")).await.unwrap();
        for i in 0..7 {
            bot.handle_message(&ch, &msg(1, &format!("u1-{i}"))).await.unwrap();
            bot.handle_message(&ch, &msg(2, &format!("u2-{i}"))).await.unwrap();
        }

        let calls = synth.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].iter().all(|a| a.starts_with("u1-")));
        assert!(calls[1].iter().all(|a| a.starts_with("u2-")));
    }
}
