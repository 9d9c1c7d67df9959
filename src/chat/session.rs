//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the message
//! history for one conversation and drives completions through a
//! [`Completion`] implementation.

use crate::chat::config::{ChatConfig, ImageContext};
use crate::chat::history::MessageHistory;
use crate::client::{Completion, Mistral};
use crate::error::{Error, Result};
use crate::observability::{SESSION_FAILED_TURNS, SESSION_TURNS};
use crate::types::{
    ChatCompletionParams, EncodedImage, MessageParam, Mode, Model, Reply, Usage,
};

/// A single user turn, shaped by the session's mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Turn<'a> {
    /// Text-only turn.
    Text(&'a str),
    /// Text plus one image.
    TextAndImage {
        /// The prompt text.
        text: &'a str,
        /// The attached image.
        image: &'a EncodedImage,
    },
}

impl<'a> Turn<'a> {
    /// Pairs the input with the mode, rejecting a missing or unexpected image.
    pub fn for_mode(mode: Mode, text: &'a str, image: Option<&'a EncodedImage>) -> Result<Self> {
        match (mode, image) {
            (Mode::TextOnly, None) => Ok(Turn::Text(text)),
            (Mode::TextAndImage, Some(image)) => Ok(Turn::TextAndImage { text, image }),
            (mode, image) => Err(Error::mode_mismatch(mode, image.is_some())),
        }
    }

    /// The history entry for this turn.
    pub fn into_message(self) -> MessageParam {
        match self {
            Turn::Text(text) => MessageParam::user(text),
            Turn::TextAndImage { text, image } => MessageParam::user_with_image(text, image),
        }
    }
}

/// A chat session bound to one mode and one model.
///
/// The session exclusively owns its history. A failed completion leaves the
/// user entry in place with no assistant reply after it.
pub struct ChatSession<C: Completion = Mistral> {
    completion: C,
    config: ChatConfig,
    history: MessageHistory,
    usage_totals: Usage,
    last_turn_usage: Option<Usage>,
    successful_turns: u64,
    failed_turns: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// The session's mode.
    pub mode: Mode,
    /// The model used for the session.
    pub model: Model,
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// The sampling temperature, if set.
    pub temperature: Option<f32>,
    /// The maximum tokens per response, if set.
    pub max_tokens: Option<u32>,
    /// History sent with image-mode requests.
    pub image_context: ImageContext,
    /// Turns that received a reply.
    pub successful_turns: u64,
    /// Turns whose completion failed.
    pub failed_turns: u64,
    /// Token totals across all replies that reported usage.
    pub total_usage: Usage,
    /// Usage of the last successful turn, if reported.
    pub last_turn_usage: Option<Usage>,
}

impl<C: Completion> ChatSession<C> {
    /// Starts a session with an empty history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModelForMode`] if the configured model is not
    /// on the configured mode's allow-list.
    pub fn start(completion: C, config: ChatConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(mode = %config.mode, model = %config.model, "chat session started");
        Ok(Self {
            completion,
            config,
            history: MessageHistory::new(),
            usage_totals: Usage::default(),
            last_turn_usage: None,
            successful_turns: 0,
            failed_turns: 0,
        })
    }

    /// Sends a user turn and returns the assistant's reply.
    ///
    /// This method:
    /// 1. Checks the image argument against the mode
    /// 2. Adds the user message to history
    /// 3. Sends the mode-appropriate view of the history
    /// 4. Adds the assistant reply to history
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModeMismatch`] (with history untouched) if an image is
    /// given in text mode or omitted in image mode. Completion errors are
    /// returned as-is, after the user entry has been recorded.
    pub async fn ask(&mut self, text: &str, image: Option<&EncodedImage>) -> Result<String> {
        let turn = Turn::for_mode(self.config.mode, text, image)?;
        SESSION_TURNS.click();

        self.history.push(turn.into_message());
        let params = self.build_params();

        match self.completion.complete(&params).await {
            Ok(reply) => Ok(self.record_reply(reply)),
            Err(err) => {
                SESSION_FAILED_TURNS.click();
                self.failed_turns = self.failed_turns.saturating_add(1);
                tracing::warn!(
                    error = %err,
                    history_len = self.history.len(),
                    "turn failed; user entry kept without reply"
                );
                Err(err)
            }
        }
    }

    /// Builds the request for the current history.
    ///
    /// Text mode always sends the whole history. Image mode sends the whole
    /// history under [`ImageContext::Full`] and only the newest entry under
    /// [`ImageContext::LatestOnly`].
    pub fn build_params(&self) -> ChatCompletionParams {
        let messages = match (self.config.mode, self.config.image_context) {
            (Mode::TextAndImage, ImageContext::LatestOnly) => {
                self.history.last().cloned().into_iter().collect()
            }
            _ => self.history.snapshot().to_vec(),
        };
        ChatCompletionParams::new(self.config.model, messages)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
    }

    /// Returns the conversation so far, oldest first.
    pub fn history(&self) -> &[MessageParam] {
        self.history.snapshot()
    }

    /// Clears the conversation history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// Returns the session's mode.
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Returns the session's model.
    pub fn model(&self) -> Model {
        self.config.model
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Returns the completion backend.
    pub fn completion(&self) -> &C {
        &self.completion
    }

    /// Ends the session and hands back the completion backend.
    pub fn into_completion(self) -> C {
        self.completion
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            mode: self.config.mode,
            model: self.config.model,
            message_count: self.message_count(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            image_context: self.config.image_context,
            successful_turns: self.successful_turns,
            failed_turns: self.failed_turns,
            total_usage: self.usage_totals,
            last_turn_usage: self.last_turn_usage,
        }
    }

    fn record_reply(&mut self, reply: Reply) -> String {
        self.successful_turns = self.successful_turns.saturating_add(1);
        if let Some(usage) = reply.usage {
            self.usage_totals = self.usage_totals + usage;
        }
        self.last_turn_usage = reply.usage;
        self.history.push(MessageParam::assistant(reply.content.clone()));
        reply.content
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::types::{MessageParamContent, MessageRole};

    /// Replays canned replies and records every request.
    #[derive(Default)]
    struct FakeCompletion {
        replies: Mutex<VecDeque<Result<Reply>>>,
        requests: Mutex<Vec<ChatCompletionParams>>,
    }

    impl FakeCompletion {
        fn replying(replies: Vec<Result<Reply>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatCompletionParams> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Completion for FakeCompletion {
        async fn complete(&self, params: &ChatCompletionParams) -> Result<Reply> {
            self.requests.lock().unwrap().push(params.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Reply::new("default reply")))
        }
    }

    fn text_session(replies: Vec<Result<Reply>>) -> ChatSession<FakeCompletion> {
        ChatSession::start(FakeCompletion::replying(replies), ChatConfig::default()).unwrap()
    }

    fn image_session(
        replies: Vec<Result<Reply>>,
        image_context: ImageContext,
    ) -> ChatSession<FakeCompletion> {
        let config = ChatConfig::new(Mode::TextAndImage, Model::Pixtral12b2409)
            .with_image_context(image_context);
        ChatSession::start(FakeCompletion::replying(replies), config).unwrap()
    }

    #[test]
    fn new_session_empty() {
        let session = text_session(vec![]);
        assert_eq!(session.message_count(), 0);
        assert!(session.history().is_empty());
        assert_eq!(session.mode(), Mode::TextOnly);
        assert_eq!(session.model(), Model::MistralSmallLatest);
    }

    #[test]
    fn start_rejects_model_from_other_mode() {
        let config = ChatConfig::new(Mode::TextOnly, Model::Pixtral12b2409);
        let err = ChatSession::start(FakeCompletion::default(), config)
            .err()
            .unwrap();
        assert!(err.is_invalid_model_for_mode());

        let config = ChatConfig::new(Mode::TextAndImage, Model::MistralSmallLatest);
        assert!(ChatSession::start(FakeCompletion::default(), config).is_err());
    }

    #[tokio::test]
    async fn hello_scenario() {
        let mut session = text_session(vec![Ok(Reply::new("Hi there"))]);

        let reply = session.ask("Hello", None).await.unwrap();
        assert_eq!(reply, "Hi there");
        assert_eq!(
            session.history(),
            &[MessageParam::user("Hello"), MessageParam::assistant("Hi there")]
        );
    }

    #[tokio::test]
    async fn successful_turns_alternate() {
        let mut session = text_session(vec![]);
        for i in 0..4 {
            session.ask(&format!("question {i}"), None).await.unwrap();
        }

        let history = session.history();
        assert_eq!(history.len(), 8);
        for (i, entry) in history.iter().enumerate() {
            let expected = if i % 2 == 0 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            assert_eq!(entry.role, expected, "entry {i}");
        }
    }

    #[tokio::test]
    async fn text_mode_sends_full_history() {
        let mut session = text_session(vec![Ok(Reply::new("one")), Ok(Reply::new("two"))]);
        session.ask("first", None).await.unwrap();
        session.ask("second", None).await.unwrap();

        let requests = session.completion().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].messages, vec![MessageParam::user("first")]);
        assert_eq!(
            requests[1].messages,
            vec![
                MessageParam::user("first"),
                MessageParam::assistant("one"),
                MessageParam::user("second"),
            ]
        );
        assert_eq!(requests[1].model, Model::MistralSmallLatest);
        assert_eq!(requests[1].temperature, Some(0.7));
        assert_eq!(requests[1].max_tokens, Some(400));
    }

    #[tokio::test]
    async fn failed_turn_keeps_user_entry_only() {
        let mut session = text_session(vec![
            Ok(Reply::new("fine")),
            Err(Error::http_status(500, "internal error")),
        ]);
        session.ask("works", None).await.unwrap();
        let before = session.message_count();

        let err = session.ask("breaks", None).await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(session.message_count(), before + 1);
        assert_eq!(session.history().last(), Some(&MessageParam::user("breaks")));

        let stats = session.stats();
        assert_eq!(stats.successful_turns, 1);
        assert_eq!(stats.failed_turns, 1);
    }

    #[tokio::test]
    async fn turn_after_failure_resends_dangling_entry() {
        let mut session = text_session(vec![Err(Error::timeout("slow", Some(30.0)))]);
        assert!(session.ask("lost", None).await.unwrap_err().is_timeout());
        session.ask("again", None).await.unwrap();

        let requests = session.completion().requests();
        assert_eq!(
            requests[1].messages,
            vec![MessageParam::user("lost"), MessageParam::user("again")]
        );
        assert_eq!(session.message_count(), 3);
    }

    #[tokio::test]
    async fn clear_history_resets() {
        let mut session = text_session(vec![]);
        session.ask("a", None).await.unwrap();
        session.ask("b", None).await.unwrap();
        assert_eq!(session.message_count(), 4);

        session.clear_history();
        assert!(session.history().is_empty());

        session.ask("c", None).await.unwrap();
        let requests = session.completion().requests();
        assert_eq!(requests[2].messages, vec![MessageParam::user("c")]);
    }

    #[tokio::test]
    async fn image_in_text_mode_is_mode_mismatch() {
        let mut session = text_session(vec![]);
        let image = EncodedImage::from_bytes(b"jpeg");

        let err = session.ask("look", Some(&image)).await.unwrap_err();
        assert!(err.is_mode_mismatch());
        assert!(session.history().is_empty());
        assert!(session.completion().requests().is_empty());
    }

    #[tokio::test]
    async fn missing_image_in_image_mode_is_mode_mismatch() {
        let mut session = image_session(vec![], ImageContext::Full);

        let err = session.ask("look", None).await.unwrap_err();
        assert!(err.is_mode_mismatch());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn image_turn_carries_text_and_image() {
        let mut session = image_session(vec![Ok(Reply::new("A cat."))], ImageContext::Full);
        let image = EncodedImage::from_bytes(b"jpeg");

        let reply = session.ask("What is this?", Some(&image)).await.unwrap();
        assert_eq!(reply, "A cat.");

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], MessageParam::user_with_image("What is this?", &image));
        assert_eq!(
            history[1].content,
            MessageParamContent::String("A cat.".to_string())
        );
        assert_eq!(
            session.completion().requests()[0].model,
            Model::Pixtral12b2409
        );
    }

    #[tokio::test]
    async fn image_mode_full_context_sends_history() {
        let mut session = image_session(vec![], ImageContext::Full);
        let image = EncodedImage::from_bytes(b"jpeg");
        session.ask("first", Some(&image)).await.unwrap();
        session.ask("second", Some(&image)).await.unwrap();

        let requests = session.completion().requests();
        assert_eq!(requests[1].messages.len(), 3);
        assert_eq!(requests[1].messages[0].content.image_count(), 1);
        assert_eq!(requests[1].messages[2].content.image_count(), 1);
    }

    #[tokio::test]
    async fn image_mode_latest_only_sends_newest_entry() {
        let mut session = image_session(vec![], ImageContext::LatestOnly);
        let image = EncodedImage::from_bytes(b"jpeg");
        session.ask("first", Some(&image)).await.unwrap();
        session.ask("second", Some(&image)).await.unwrap();

        let requests = session.completion().requests();
        assert_eq!(
            requests[1].messages,
            vec![MessageParam::user_with_image("second", &image)]
        );
        // The local transcript still has every turn.
        assert_eq!(session.message_count(), 4);
    }

    #[tokio::test]
    async fn usage_is_accumulated() {
        let mut session = text_session(vec![
            Ok(Reply {
                content: "a".to_string(),
                usage: Some(Usage::new(10, 2)),
            }),
            Ok(Reply::new("b")),
            Ok(Reply {
                content: "c".to_string(),
                usage: Some(Usage::new(20, 4)),
            }),
        ]);
        session.ask("1", None).await.unwrap();
        session.ask("2", None).await.unwrap();
        assert_eq!(session.stats().last_turn_usage, None);
        session.ask("3", None).await.unwrap();

        let stats = session.stats();
        assert_eq!(stats.total_usage, Usage::new(30, 6));
        assert_eq!(stats.last_turn_usage, Some(Usage::new(20, 4)));
        assert_eq!(stats.successful_turns, 3);
        assert_eq!(stats.message_count, 6);
    }

    #[test]
    fn turn_dispatch() {
        let image = EncodedImage::from_bytes(b"x");
        assert_eq!(
            Turn::for_mode(Mode::TextOnly, "hi", None).unwrap(),
            Turn::Text("hi")
        );
        assert!(matches!(
            Turn::for_mode(Mode::TextAndImage, "hi", Some(&image)).unwrap(),
            Turn::TextAndImage { text: "hi", .. }
        ));
        let err = Turn::for_mode(Mode::TextOnly, "hi", Some(&image)).unwrap_err();
        assert!(matches!(
            err,
            Error::ModeMismatch {
                mode: Mode::TextOnly,
                image_supplied: true
            }
        ));
    }
}
