use super::conversation::ConversationLog;
use crate::api::{ChatRequest, ModelApi, ProviderTurn, Speaker};
use crate::error::{GenerationError, TurnError};
use crate::models::{GenerationConfig, Message, Role};
use std::sync::Arc;

/// Map log entries to provider turns, order preserving. With `exclude_last`
/// the final entry is dropped, but only when there is more than one entry.
pub fn project_history(log: &[Message], exclude_last: bool) -> Vec<ProviderTurn> {
    let take = if exclude_last && log.len() > 1 {
        log.len() - 1
    } else {
        log.len()
    };

    log.iter()
        .take(take)
        .map(|message| ProviderTurn {
            speaker: match message.role() {
                Role::User => Speaker::User,
                Role::Assistant => Speaker::Model,
            },
            text: message.content().to_string(),
        })
        .collect()
}

/// Owns the conversation of one session and applies each turn's outcome to it.
///
/// A turn either ends with the user message followed by the reply, or with
/// the user message removed again. The log never keeps an unanswered turn.
pub struct SessionManager {
    client: Option<Arc<dyn ModelApi>>,
    log: ConversationLog,
}

impl SessionManager {
    /// `client` is `None` when no API key was available at startup.
    pub fn new(client: Option<Arc<dyn ModelApi>>) -> Self {
        Self {
            client,
            log: ConversationLog::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn append_user_turn(&mut self, content: impl Into<String>) {
        self.log.push(Message::user(content));
    }

    /// Ask the model to answer the last (user) entry of the log. The log is
    /// left untouched; the caller decides what to do with the outcome.
    pub async fn send_turn(&self, config: &GenerationConfig) -> Result<Message, GenerationError> {
        let client = self.client.as_ref().ok_or(GenerationError::NotConfigured)?;

        let last = self
            .log
            .last()
            .filter(|m| m.is_user())
            .ok_or_else(|| {
                GenerationError::InvalidState("last log entry is not a user message".to_string())
            })?;

        // A lone user turn starts a fresh provider chat.
        let history = if self.log.len() > 1 {
            project_history(self.log.as_slice(), true)
        } else {
            Vec::new()
        };

        let request = ChatRequest {
            model: config.model().to_string(),
            history,
            message: last.content().to_string(),
            temperature: config.temperature(),
            max_output_tokens: config.max_output_tokens(),
        };

        let text = client.generate(&request).await?;
        Ok(Message::assistant(text))
    }

    /// Run one full turn: append, send, then commit the reply or roll back.
    pub async fn submit(
        &mut self,
        content: impl Into<String>,
        config: &GenerationConfig,
    ) -> Result<Message, TurnError> {
        self.append_user_turn(content);

        if !self.is_configured() {
            self.log.pop();
            return Err(TurnError::Configuration(format!(
                "Missing {} in the environment or secrets file",
                crate::config::API_KEY_VAR
            )));
        }

        match self.send_turn(config).await {
            Ok(reply) => {
                self.log.push(reply.clone());
                Ok(reply)
            }
            Err(e) => {
                log::debug!("Turn failed, rolling back user message: {}", e);
                self.log.pop();
                Err(TurnError::Generation(e))
            }
        }
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}
