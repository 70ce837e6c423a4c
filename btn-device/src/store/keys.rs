//! Device store key space
//!
//! | Key | Value |
//! |-----|-------|
//! | `cartItems` | `Vec<CartLine>` |
//! | `orders` | `Vec<Order>` (pending) |
//! | `paidOrders` | `Vec<Order>` (paid or cancelled, forwarded to a waiter) |
//! | `history` | `Vec<Order>` (append-only, paid only) |
//! | `tableMessages` | `Vec<Message>` (newest first, ≤ 100) |
//! | `notificationHistory` | `Vec<Notification>` (newest first, ≤ 50) |
//! | `selectedTable` / `selectedTableName` | `String` (first selected table) |
//! | `selectedTables` / `selectedTableNames` | `Vec<String>` |
//! | `nameUser` / `role` / `username` | `String` |
//! | `isGuest` | `bool` |

use std::fmt;

/// A key of the device store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    CartItems,
    Orders,
    PaidOrders,
    History,
    TableMessages,
    NotificationHistory,
    SelectedTable,
    SelectedTableName,
    SelectedTables,
    SelectedTableNames,
    NameUser,
    Role,
    Username,
    IsGuest,
}

/// Keys cleared on logout
pub const SESSION_KEYS: [StoreKey; 4] = [
    StoreKey::Username,
    StoreKey::NameUser,
    StoreKey::Role,
    StoreKey::IsGuest,
];

impl StoreKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StoreKey::CartItems => "cartItems",
            StoreKey::Orders => "orders",
            StoreKey::PaidOrders => "paidOrders",
            StoreKey::History => "history",
            StoreKey::TableMessages => "tableMessages",
            StoreKey::NotificationHistory => "notificationHistory",
            StoreKey::SelectedTable => "selectedTable",
            StoreKey::SelectedTableName => "selectedTableName",
            StoreKey::SelectedTables => "selectedTables",
            StoreKey::SelectedTableNames => "selectedTableNames",
            StoreKey::NameUser => "nameUser",
            StoreKey::Role => "role",
            StoreKey::Username => "username",
            StoreKey::IsGuest => "isGuest",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
