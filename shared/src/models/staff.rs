//! Staff and Session Models

use serde::{Deserialize, Serialize};

/// Staff role, decides which dashboard a login lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Serves tables and completes paid orders
    Waiter,
    /// Confirms or cancels pending orders
    Receiver,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiter => "waiter",
            Self::Receiver => "receiver",
        }
    }
}

/// Login account of a staff member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAccount {
    pub username: String,
    pub password: String,
    pub role: StaffRole,
    /// Display name
    pub name: String,
}

/// Screen a successful login navigates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dashboard {
    Waiter,
    OrderReceiver,
    TableSelection,
}

impl From<StaffRole> for Dashboard {
    fn from(role: StaffRole) -> Self {
        match role {
            StaffRole::Waiter => Dashboard::Waiter,
            StaffRole::Receiver => Dashboard::OrderReceiver,
        }
    }
}

/// Who is using the device right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    Guest,
    Staff {
        username: String,
        name: String,
        role: StaffRole,
    },
}

impl Session {
    pub fn role(&self) -> Option<StaffRole> {
        match self {
            Session::Guest => None,
            Session::Staff { role, .. } => Some(*role),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Guest => None,
            Session::Staff { username, .. } => Some(username),
        }
    }
}
