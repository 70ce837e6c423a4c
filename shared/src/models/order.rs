//! Order Model

use super::cart::CartLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Serialized with the exact strings the dashboards display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Waiting for the order receiver to confirm payment
    #[serde(rename = "Đang chờ thanh toán")]
    Pending,
    /// Payment confirmed, forwarded to the table's waiter
    #[serde(rename = "Đã thanh toán")]
    Paid,
    /// Cancelled by the order receiver, still forwarded to the waiter
    #[serde(rename = "Đã huỷ")]
    Cancelled,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Đang chờ thanh toán",
            Self::Paid => "Đã thanh toán",
            Self::Cancelled => "Đã huỷ",
        }
    }

    /// Paid and cancelled orders have left the pending list
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A checked-out cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// uuid v4
    pub id: String,
    /// Table display name
    pub table: String,
    pub table_id: String,
    /// Frozen snapshot of the cart at checkout
    pub items: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    /// Waiter responsible for the table, set when the order is forwarded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiter_id: Option<String>,
}

impl Order {
    pub fn new(
        table_id: impl Into<String>,
        table_name: impl Into<String>,
        items: Vec<CartLine>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            table: table_name.into(),
            table_id: table_id.into(),
            items,
            created_at: Utc::now(),
            status: OrderStatus::Pending,
            waiter_id: None,
        }
    }

    /// Σ price × quantity over the snapshot
    pub fn total(&self) -> i64 {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Σ quantity over the snapshot
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
