//! Simulated assistant: canned replies after a fixed delay.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shared::chat::{canned_replies, greeting};
use shared::{ChatMessage, ChatRole, Locale};
use tracing::info;

use crate::domain::errors::AppError;

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1500);

/// Picks replies; shared by every conversation of the process.
#[derive(Clone)]
pub struct ChatService {
    rng: Arc<Mutex<StdRng>>,
    delay: Duration,
}

impl ChatService {
    /// `seed` makes the reply sequence reproducible.
    pub fn new(delay: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Arc::new(Mutex::new(rng)),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pick_reply(&self, locale: Locale) -> &'static str {
        let replies = canned_replies(locale);
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        replies.choose(&mut *rng).copied().unwrap_or(greeting(locale))
    }

    /// Wait out the reply delay, then produce the assistant message.
    pub async fn reply(&self, locale: Locale) -> ChatMessage {
        tokio::time::sleep(self.delay).await;
        ChatMessage::new(ChatRole::Assistant, self.pick_reply(locale))
    }
}

impl Default for ChatService {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingReply,
}

/// One conversation. Starts with the locale's greeting.
pub struct ChatSession {
    service: ChatService,
    locale: Locale,
    messages: Vec<ChatMessage>,
    state: ChatState,
}

impl ChatSession {
    pub fn new(service: ChatService, locale: Locale) -> Self {
        Self {
            service,
            locale,
            messages: vec![ChatMessage::new(ChatRole::Assistant, greeting(locale))],
            state: ChatState::Idle,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Append the user's message and start waiting for a reply.
    ///
    /// Blank text is ignored and returns `Ok(None)`; a submission while a
    /// reply is pending is rejected with `AppError::Busy`.
    pub fn submit(&mut self, text: &str) -> Result<Option<ChatMessage>, AppError> {
        if self.state == ChatState::AwaitingReply {
            return Err(AppError::Busy);
        }
        if text.trim().is_empty() {
            return Ok(None);
        }

        let message = ChatMessage::new(ChatRole::User, text);
        self.messages.push(message.clone());
        self.state = ChatState::AwaitingReply;
        info!("Chat message submitted ({} chars)", text.len());
        Ok(Some(message))
    }

    /// Deliver the pending reply once the delay has passed.
    /// Returns `None` when no reply was pending.
    pub async fn receive_reply(&mut self) -> Option<ChatMessage> {
        if self.state != ChatState::AwaitingReply {
            return None;
        }
        let reply = self.service.reply(self.locale).await;
        self.messages.push(reply.clone());
        self.state = ChatState::Idle;
        Some(reply)
    }

    pub async fn send(&mut self, text: &str) -> Result<Option<ChatMessage>, AppError> {
        if self.submit(text)?.is_none() {
            return Ok(None);
        }
        Ok(self.receive_reply().await)
    }
}
