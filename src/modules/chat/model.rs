use serde::{Deserialize, Serialize};

pub const TYPING_PREFIX: &str = "Typing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub is_streaming: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            is_streaming: false,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            is_streaming: false,
        }
    }

    pub fn streaming(text: impl Into<String>) -> Self {
        Self {
            is_streaming: true,
            ..Self::bot(text)
        }
    }

    pub fn typing(dots: &str) -> Self {
        Self::streaming(format!("{}{}", TYPING_PREFIX, dots))
    }

    pub fn is_streaming(&self) -> bool {
        self.is_streaming
    }

    pub fn is_typing_placeholder(&self) -> bool {
        self.sender == Sender::Bot && self.is_streaming && self.text.starts_with(TYPING_PREFIX)
    }
}

/// Ordered chat history. Only the trailing message is ever rewritten, and at
/// most that one message is still streaming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageList {
    messages: Vec<Message>,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. A trailing streaming message is finalised first so
    /// the streaming flag can only ever sit on the last entry.
    pub fn push(&mut self, message: Message) {
        if let Some(last) = self.messages.last_mut() {
            last.is_streaming = false;
        }
        self.messages.push(message);
    }

    /// Swaps the last message for `value` when it satisfies `predicate`.
    pub fn replace_last<P>(&mut self, predicate: P, value: Message) -> bool
    where
        P: FnOnce(&Message) -> bool,
    {
        match self.messages.last_mut() {
            Some(last) if predicate(last) => {
                *last = value;
                true
            }
            _ => false,
        }
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn streaming_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_streaming).count()
    }
}

impl<'a> IntoIterator for &'a MessageList {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Where the orchestrator writes chat state. Implemented by whatever renders it.
pub trait ChatView {
    fn messages_mut(&mut self) -> &mut MessageList;

    fn set_loading(&mut self, loading: bool);

    /// Called after every change to the message list.
    fn refresh(&mut self) {}
}

/// Plain in-memory chat state.
#[derive(Debug, Default)]
pub struct ChatSession {
    pub messages: MessageList,
    pub loading: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatView for ChatSession {
    fn messages_mut(&mut self) -> &mut MessageList {
        &mut self.messages
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}
