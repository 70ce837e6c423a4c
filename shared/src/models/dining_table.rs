//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Number of physical tables in the restaurant
pub const TABLE_COUNT: usize = 12;

/// Dining table (bàn)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    pub name: String,
}

impl DiningTable {
    /// Table `n`, 1-based
    pub fn numbered(n: usize) -> Self {
        Self {
            id: format!("table_{}", n),
            name: format!("Table {}", n),
        }
    }

    /// The fixed set of tables, `table_1` through `table_12`
    pub fn all() -> Vec<Self> {
        (1..=TABLE_COUNT).map(Self::numbered).collect()
    }
}

/// Table with its point-in-time occupancy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStatus {
    #[serde(flatten)]
    pub table: DiningTable,
    pub occupied: bool,
}
