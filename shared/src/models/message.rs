//! Table Message Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a table message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Waiter,
    Guest,
}

/// Message exchanged between a waiter and the guests of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub table_id: String,
    pub message: String,
    pub sender_type: SenderType,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

impl Message {
    /// Unread message written by a waiter, i.e. one the guest has not seen yet
    pub fn is_unread_from_waiter(&self) -> bool {
        self.sender_type == SenderType::Waiter && !self.is_read
    }
}

/// Per-table conversation summary for the waiter messaging screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub table_id: String,
    pub last_message: Message,
    pub message_count: usize,
    /// Guest messages newer than the last waiter message
    pub awaiting_reply: usize,
}
