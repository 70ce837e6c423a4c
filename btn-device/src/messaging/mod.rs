//! Table messaging between waiters and guests
//!
//! All tables share one `tableMessages` list, newest first, capped at
//! [`MESSAGE_CAP`]. Only waiter messages count as unread: they are what a
//! guest has not seen yet. Waiter messages also raise a notification.

use crate::notifications::NotificationCenter;
use crate::store::{DeviceStore, StoreError, StoreKey};
use shared::models::{Conversation, Message, Notification, NotificationKind, SenderType};
use shared::{AppError, ErrorCode};
use std::collections::HashMap;
use thiserror::Error;

/// Maximum messages kept across all tables
pub const MESSAGE_CAP: usize = 100;

/// Canned waiter messages offered on the messaging screen
pub const WAITER_QUICK_MESSAGES: [&str; 8] = [
    "Món ăn của bạn sẽ được phục vụ trong 10 phút nữa.",
    "Bạn vui lòng đợi thêm 5 phút nữa nhé!",
    "Cảm ơn bạn đã chờ đợi. Món ăn đang được chuẩn bị.",
    "Bạn có cần thêm nước uống không?",
    "Có gì cần hỗ trợ thêm không ạ?",
    "Món ăn đã sẵn sàng, chúng tôi sẽ mang ra ngay.",
    "Xin lỗi vì sự chậm trễ, món ăn sẽ ra trong 3 phút nữa.",
    "Bạn có muốn thêm tráng miệng không?",
];

/// One-tap guest replies
pub const GUEST_QUICK_REPLIES: [&str; 2] = ["OK, mình đợi", "Gọi nhân viên"];

const WAITER_MESSAGE_TITLE: &str = "Tin nhắn từ nhân viên";

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Message is empty")]
    EmptyMessage,
}

impl From<MessagingError> for AppError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::Storage(e) => e.into(),
            MessagingError::EmptyMessage => {
                AppError::with_message(ErrorCode::RequiredField, "Message is empty")
                    .with_detail("field", "message")
            }
        }
    }
}

pub type MessagingResult<T> = Result<T, MessagingError>;

#[derive(Debug, Clone)]
pub struct MessagingService {
    store: DeviceStore,
    notifications: NotificationCenter,
}

impl MessagingService {
    pub fn new(store: DeviceStore, notifications: NotificationCenter) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Store a message; waiter messages also notify the guest
    ///
    /// Text is trimmed; blank text is rejected.
    pub fn send(&self, table_id: &str, text: &str, sender: SenderType) -> MessagingResult<Message> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MessagingError::EmptyMessage);
        }

        let message = Message {
            id: shared::util::record_id(),
            table_id: table_id.to_string(),
            message: text.to_string(),
            sender_type: sender,
            timestamp: shared::util::now(),
            is_read: false,
        };

        let stored = message.clone();
        self.store
            .update_list(StoreKey::TableMessages, |messages: &mut Vec<Message>| {
                messages.insert(0, stored);
                messages.truncate(MESSAGE_CAP);
            })?;

        tracing::debug!(table_id = %table_id, sender = ?sender, message_id = %message.id, "Message sent");

        if sender == SenderType::Waiter {
            self.notifications.deliver(
                Notification::new(NotificationKind::WaiterMessage, WAITER_MESSAGE_TITLE, text)
                    .for_table(table_id),
            );
        }
        Ok(message)
    }

    /// Guest reply
    pub fn quick_reply(&self, table_id: &str, text: &str) -> MessagingResult<Message> {
        self.send(table_id, text, SenderType::Guest)
    }

    /// Send one of [`WAITER_QUICK_MESSAGES`]; `None` for an out-of-range index
    pub fn send_quick_message(&self, table_id: &str, index: usize) -> MessagingResult<Option<Message>> {
        match WAITER_QUICK_MESSAGES.get(index) {
            Some(text) => self.send(table_id, text, SenderType::Waiter).map(Some),
            None => Ok(None),
        }
    }

    /// Messages of one table, newest first
    pub fn by_table(&self, table_id: &str) -> MessagingResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .store
            .get_list::<Message>(StoreKey::TableMessages)?
            .into_iter()
            .filter(|m| m.table_id == table_id)
            .collect();
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    /// Waiter messages the guests of a table have not read
    pub fn unread(&self, table_id: &str) -> MessagingResult<Vec<Message>> {
        Ok(self
            .by_table(table_id)?
            .into_iter()
            .filter(Message::is_unread_from_waiter)
            .collect())
    }

    pub fn unread_count(&self, table_id: &str) -> MessagingResult<usize> {
        Ok(self.unread(table_id)?.len())
    }

    /// Mark every waiter message of a table read; returns how many flipped
    pub fn mark_read(&self, table_id: &str) -> MessagingResult<usize> {
        let flipped = self
            .store
            .update_list(StoreKey::TableMessages, |messages: &mut Vec<Message>| {
                let mut flipped = 0;
                for m in messages
                    .iter_mut()
                    .filter(|m| m.table_id == table_id && m.sender_type == SenderType::Waiter)
                {
                    if !m.is_read {
                        m.is_read = true;
                        flipped += 1;
                    }
                }
                flipped
            })?;
        Ok(flipped)
    }

    /// Per-table summaries, most recently active table first
    pub fn conversations(&self) -> MessagingResult<Vec<Conversation>> {
        let messages: Vec<Message> = self.store.get_list(StoreKey::TableMessages)?;

        let mut by_table: HashMap<&str, Vec<&Message>> = HashMap::new();
        for m in &messages {
            by_table.entry(m.table_id.as_str()).or_default().push(m);
        }

        let mut conversations: Vec<Conversation> = by_table
            .into_iter()
            .filter_map(|(table_id, mut thread)| {
                thread.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                let awaiting_reply = thread
                    .iter()
                    .take_while(|m| m.sender_type == SenderType::Guest)
                    .count();
                let last = thread.first()?;
                Some(Conversation {
                    table_id: table_id.to_string(),
                    last_message: (*last).clone(),
                    message_count: thread.len(),
                    awaiting_reply,
                })
            })
            .collect();

        conversations.sort_by(|a, b| {
            b.last_message
                .timestamp
                .cmp(&a.last_message.timestamp)
                .then_with(|| a.table_id.cmp(&b.table_id))
        });
        Ok(conversations)
    }
}
