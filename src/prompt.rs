use crate::error::{Result, WardenError};
use serde::{Deserialize, Serialize};

/// Role tag on a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Assistant,
    System,
}

impl Role {
    /// Role name understood by chat-completions APIs.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::Human => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The value every pipeline stage consumes and produces: an ordered sequence
/// of role-tagged messages.
///
/// Stages never mutate a `PromptValue` in place. A stage that rewrites text
/// builds a new value with [`PromptValue::with_latest_human_text`]; all other
/// messages are preserved verbatim, and only the latest human message is ever
/// inspected or rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptValue {
    messages: Vec<Message>,
}

impl PromptValue {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// A prompt holding a single human message, the shape every CLI
    /// invocation starts from.
    pub fn from_human(text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::new(Role::Human, text)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The latest human message. Absence is a caller contract violation,
    /// not a guard failure.
    pub fn latest_human(&self) -> Result<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::Human)
            .ok_or(WardenError::MalformedPrompt)
    }

    pub fn latest_human_text(&self) -> Result<&str> {
        Ok(self.latest_human()?.content.as_str())
    }

    /// A new prompt identical to this one except the latest human message's
    /// text is replaced. Never appends; the message count is unchanged.
    pub fn with_latest_human_text(&self, text: impl Into<String>) -> Result<PromptValue> {
        let index = self
            .messages
            .iter()
            .rposition(|message| message.role == Role::Human)
            .ok_or(WardenError::MalformedPrompt)?;

        let mut messages = self.messages.clone();
        messages[index].content = text.into();
        Ok(PromptValue { messages })
    }
}
