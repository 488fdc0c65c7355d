// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text conversation with the companion.
//!
//! Each turn moves `Idle -> Sending -> Idle`. At most one turn is in flight
//! per session; a second `send` while one is pending fails with
//! [`AletheiaError::Busy`] instead of interleaving persisted turns.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use aletheia_core::types::{ChatMessage, Role};
use aletheia_core::{AletheiaError, SessionContext, StorageAdapter};
use aletheia_gateway::AnalysisGateway;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// States of the text conversation FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ChatState {
    Idle,
    Sending,
}

/// A completed exchange: the user's message and the companion's reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub user: ChatMessage,
    pub assistant: ChatMessage,
}

/// Resets the in-flight flag however the send ends, including cancellation.
struct SendGuard<'a>(&'a AtomicBool);

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Ordered chat history for the signed-in user plus the send pipeline.
pub struct ConversationSession {
    session: SessionContext,
    storage: Arc<dyn StorageAdapter>,
    gateway: Arc<AnalysisGateway>,
    history: Mutex<Vec<ChatMessage>>,
    sending: AtomicBool,
}

impl ConversationSession {
    pub fn new(
        session: SessionContext,
        storage: Arc<dyn StorageAdapter>,
        gateway: Arc<AnalysisGateway>,
    ) -> Self {
        Self {
            session,
            storage,
            gateway,
            history: Mutex::new(Vec::new()),
            sending: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ChatState {
        if self.sending.load(Ordering::SeqCst) {
            ChatState::Sending
        } else {
            ChatState::Idle
        }
    }

    pub fn persona(&self) -> &str {
        self.gateway.persona()
    }

    /// Replaces the in-memory history with the persisted one.
    pub async fn load_history(&self) -> Result<usize, AletheiaError> {
        let user_id = self.session.user_id()?;
        let persisted = self.storage.chat_history(&user_id).await?;
        let count = persisted.len();
        *self.history.lock().await = persisted;
        debug!(count, "chat history loaded");
        Ok(count)
    }

    /// Snapshot of the history, oldest first.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }

    /// Sends one user message and waits for the companion's reply.
    ///
    /// The user message is persisted before the reply is requested, so it
    /// survives a failed request. The reply is persisted once received.
    pub async fn send(&self, text: &str) -> Result<ChatTurn, AletheiaError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AletheiaError::Validation("Please enter a message".into()));
        }
        if self
            .sending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AletheiaError::Busy("a message is already being sent".into()));
        }
        let _guard = SendGuard(&self.sending);

        let user_id = self.session.user_id()?;
        let context = self.history.lock().await.clone();

        let user = ChatMessage::new(user_id.clone(), Role::User, text);
        self.storage.insert_chat_message(&user).await?;
        self.history.lock().await.push(user.clone());

        let reply = self.gateway.chat_reply(text, &context).await?;
        let assistant = ChatMessage::new(user_id, Role::Assistant, reply);
        self.storage.insert_chat_message(&assistant).await?;
        self.history.lock().await.push(assistant.clone());

        info!(history = context.len() + 2, "chat turn completed");
        Ok(ChatTurn { user, assistant })
    }

    /// Deletes every persisted message for the user. There is no undo.
    pub async fn clear(&self) -> Result<usize, AletheiaError> {
        let user_id = self.session.user_id()?;
        let removed = self.storage.clear_chat_history(&user_id).await?;
        self.history.lock().await.clear();
        Ok(removed)
    }
}
