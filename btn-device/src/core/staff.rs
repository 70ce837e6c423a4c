//! Staff directory and waiter sections
//!
//! Accounts and the table → waiter section map are configuration, not code.
//! [`StaffDirectory::default`] carries the restaurant's stock setup; a JSON
//! file (see [`super::Config::staff_config`]) can replace it.

use serde::{Deserialize, Serialize};
use shared::models::{StaffAccount, StaffRole};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Default password of the stock accounts
const DEFAULT_PASSWORD: &str = "123456";

#[derive(Debug, Error)]
pub enum StaffConfigError {
    #[error("Failed to read staff config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid staff config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Section for {table_id} names unknown waiter {waiter}")]
    UnknownWaiter { table_id: String, waiter: String },
}

/// Staff accounts plus the waiter responsible for each table
///
/// ```json
/// {
///   "accounts": [{ "username": "waiter1", "password": "…", "role": "waiter", "name": "…" }],
///   "sections": { "table_1": "waiter1" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffDirectory {
    accounts: Vec<StaffAccount>,
    /// table id -> waiter username
    #[serde(default)]
    sections: BTreeMap<String, String>,
}

impl StaffDirectory {
    pub fn new(
        accounts: Vec<StaffAccount>,
        sections: BTreeMap<String, String>,
    ) -> Result<Self, StaffConfigError> {
        let directory = Self { accounts, sections };
        directory.check_sections()?;
        Ok(directory)
    }

    /// Load a directory from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StaffConfigError> {
        let path = path.as_ref();
        let path_display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| StaffConfigError::Io {
            path: path_display.clone(),
            source,
        })?;
        let directory: Self = serde_json::from_str(&raw).map_err(|source| {
            StaffConfigError::Parse {
                path: path_display.clone(),
                source,
            }
        })?;
        directory.check_sections()?;

        tracing::info!(
            path = %path_display,
            accounts = directory.accounts.len(),
            sections = directory.sections.len(),
            "Staff directory loaded"
        );
        Ok(directory)
    }

    /// Every section must point at a waiter account
    fn check_sections(&self) -> Result<(), StaffConfigError> {
        for (table_id, waiter) in &self.sections {
            let known = self
                .accounts
                .iter()
                .any(|a| a.username == *waiter && a.role == StaffRole::Waiter);
            if !known {
                return Err(StaffConfigError::UnknownWaiter {
                    table_id: table_id.clone(),
                    waiter: waiter.clone(),
                });
            }
        }
        Ok(())
    }

    /// Account matching both username and password
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&StaffAccount> {
        self.accounts
            .iter()
            .find(|a| a.username == username && a.password == password)
    }

    pub fn account(&self, username: &str) -> Option<&StaffAccount> {
        self.accounts.iter().find(|a| a.username == username)
    }

    pub fn accounts(&self) -> &[StaffAccount] {
        &self.accounts
    }

    /// Waiter responsible for a table, if the table belongs to a section
    pub fn waiter_for_table(&self, table_id: &str) -> Option<&str> {
        self.sections.get(table_id).map(String::as_str)
    }

    /// Tables served by a waiter, in table-id order
    pub fn tables_of(&self, waiter: &str) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|(_, w)| w.as_str() == waiter)
            .map(|(table_id, _)| table_id.as_str())
            .collect()
    }
}

impl Default for StaffDirectory {
    /// Four waiters with three tables each, one order receiver
    fn default() -> Self {
        let waiter = |n: usize, letter: char| StaffAccount {
            username: format!("waiter{}", n),
            password: DEFAULT_PASSWORD.to_string(),
            role: StaffRole::Waiter,
            name: format!("Nhân viên phục vụ {}", letter),
        };

        let mut accounts: Vec<StaffAccount> = ['A', 'B', 'C', 'D']
            .into_iter()
            .enumerate()
            .map(|(i, letter)| waiter(i + 1, letter))
            .collect();
        accounts.push(StaffAccount {
            username: "receiver1".to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            role: StaffRole::Receiver,
            name: "Nhân viên nhận đơn B".to_string(),
        });

        // table_1..3 -> waiter1, table_4..6 -> waiter2, ...
        let sections = (1..=shared::models::TABLE_COUNT)
            .map(|n| (format!("table_{}", n), format!("waiter{}", (n - 1) / 3 + 1)))
            .collect();

        Self { accounts, sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sections() {
        let staff = StaffDirectory::default();
        assert_eq!(staff.waiter_for_table("table_1"), Some("waiter1"));
        assert_eq!(staff.waiter_for_table("table_3"), Some("waiter1"));
        assert_eq!(staff.waiter_for_table("table_4"), Some("waiter2"));
        assert_eq!(staff.waiter_for_table("table_9"), Some("waiter3"));
        assert_eq!(staff.waiter_for_table("table_12"), Some("waiter4"));
        assert_eq!(staff.waiter_for_table("UnknownTableId"), None);
        assert_eq!(staff.tables_of("waiter2"), vec!["table_4", "table_5", "table_6"]);
    }

    #[test]
    fn test_authenticate() {
        let staff = StaffDirectory::default();
        let account = staff.authenticate("receiver1", "123456").unwrap();
        assert_eq!(account.role, StaffRole::Receiver);
        assert_eq!(account.name, "Nhân viên nhận đơn B");

        assert!(staff.authenticate("waiter1", "wrong").is_none());
        assert!(staff.authenticate("nobody", "123456").is_none());
        assert_eq!(staff.account("waiter4").unwrap().name, "Nhân viên phục vụ D");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staff.json");
        std::fs::write(
            &path,
            r#"{
                "accounts": [
                    {"username": "an", "password": "pw", "role": "waiter", "name": "An"},
                    {"username": "binh", "password": "pw", "role": "receiver", "name": "Bình"}
                ],
                "sections": {"table_1": "an", "table_2": "an"}
            }"#,
        )
        .unwrap();

        let staff = StaffDirectory::load(&path).unwrap();
        assert_eq!(staff.accounts().len(), 2);
        assert_eq!(staff.waiter_for_table("table_2"), Some("an"));
        assert_eq!(staff.waiter_for_table("table_3"), None);
    }

    #[test]
    fn test_section_must_name_a_waiter() {
        let accounts = vec![StaffAccount {
            username: "binh".to_string(),
            password: "pw".to_string(),
            role: StaffRole::Receiver,
            name: "Bình".to_string(),
        }];
        let sections = BTreeMap::from([("table_1".to_string(), "binh".to_string())]);
        let err = StaffDirectory::new(accounts, sections).unwrap_err();
        assert!(matches!(err, StaffConfigError::UnknownWaiter { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = StaffDirectory::load("/nonexistent/staff.json").unwrap_err();
        assert!(matches!(err, StaffConfigError::Io { .. }));
    }
}
