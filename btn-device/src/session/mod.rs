//! Device session: who is logged in and which table the device serves
//!
//! Session state lives in the store under `username`, `nameUser`, `role`
//! and `isGuest`. A guest may tick several tables; the confirmed set is
//! stored under `selectedTables` / `selectedTableNames` and the first one
//! is mirrored into `selectedTable` / `selectedTableName`.

use crate::core::StaffDirectory;
use crate::orders::occupied_table_ids;
use crate::store::{DeviceStore, SESSION_KEYS, StoreError, StoreKey};
use shared::models::{Dashboard, DiningTable, Order, Session, StaffRole, TableStatus};
use shared::{AppError, ErrorCode};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Role {required:?} required")]
    RoleRequired { required: StaffRole },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table is already occupied: {0}")]
    TableOccupied(String),

    #[error("No table selected")]
    NoTableSelected,
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Storage(e) => e.into(),
            SessionError::InvalidCredentials => AppError::invalid_credentials(),
            SessionError::NotLoggedIn => AppError::not_authenticated(),
            SessionError::RoleRequired { required } => AppError::with_message(
                ErrorCode::RoleRequired,
                format!("Role {} required", required.as_str()),
            )
            .with_detail("required_role", required.as_str()),
            SessionError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, format!("Table not found: {}", id))
                    .with_detail("table_id", id)
            }
            // "Bàn đã có khách"
            SessionError::TableOccupied(id) => AppError::with_message(
                ErrorCode::TableOccupied,
                "Bàn đã có khách, vui lòng chọn bàn khác",
            )
            .with_detail("table_id", id),
            SessionError::NoTableSelected => AppError::with_message(
                ErrorCode::TableNotSelected,
                "Vui lòng chọn ít nhất một bàn",
            ),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone)]
pub struct SessionService {
    store: DeviceStore,
    staff: Arc<StaffDirectory>,
}

impl SessionService {
    pub fn new(store: DeviceStore, staff: Arc<StaffDirectory>) -> Self {
        Self { store, staff }
    }

    // ========== Login ==========

    /// Staff login; returns the dashboard for the account's role
    pub fn login(&self, username: &str, password: &str) -> SessionResult<Dashboard> {
        let username = username.trim();
        let Some(account) = self.staff.authenticate(username, password) else {
            tracing::warn!(username = %username, "Login failed");
            return Err(SessionError::InvalidCredentials);
        };

        self.store.transaction(|txn| -> SessionResult<()> {
            txn.set(StoreKey::IsGuest, &false)?;
            txn.set(StoreKey::Username, &account.username)?;
            txn.set(StoreKey::NameUser, &account.name)?;
            txn.set(StoreKey::Role, account.role.as_str())?;
            Ok(())
        })?;

        tracing::info!(username = %account.username, role = account.role.as_str(), "Staff logged in");
        Ok(Dashboard::from(account.role))
    }

    /// Guests go straight to table selection
    pub fn login_as_guest(&self) -> SessionResult<Dashboard> {
        self.store.transaction(|txn| -> SessionResult<()> {
            for key in [StoreKey::Username, StoreKey::NameUser, StoreKey::Role] {
                txn.remove(key)?;
            }
            txn.set(StoreKey::IsGuest, &true)?;
            Ok(())
        })?;
        tracing::info!("Guest session started");
        Ok(Dashboard::TableSelection)
    }

    /// Clear the session keys; cart, orders and table selection stay
    pub fn logout(&self) -> SessionResult<()> {
        self.store.remove_many(&SESSION_KEYS)?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// The stored session, if any
    pub fn current(&self) -> SessionResult<Option<Session>> {
        if self.store.get::<bool>(StoreKey::IsGuest)?.unwrap_or(false) {
            return Ok(Some(Session::Guest));
        }

        let username: Option<String> = self.store.get(StoreKey::Username)?;
        let role: Option<StaffRole> = self.store.get(StoreKey::Role)?;
        match (username, role) {
            (Some(username), Some(role)) => {
                let name = self.store.get::<String>(StoreKey::NameUser)?.unwrap_or_default();
                Ok(Some(Session::Staff {
                    username,
                    name,
                    role,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Dashboard guard
    pub fn require_role(&self, role: StaffRole) -> SessionResult<Session> {
        let session = self.current()?.ok_or(SessionError::NotLoggedIn)?;
        if session.role() != Some(role) {
            return Err(SessionError::RoleRequired { required: role });
        }
        Ok(session)
    }

    // ========== Tables ==========

    /// All tables with point-in-time occupancy
    ///
    /// A table is occupied while any forwarded order references it.
    pub fn tables(&self) -> SessionResult<Vec<TableStatus>> {
        let occupied = self.occupied()?;
        Ok(DiningTable::all()
            .into_iter()
            .map(|table| TableStatus {
                occupied: occupied.contains(&table.id),
                table,
            })
            .collect())
    }

    fn occupied(&self) -> SessionResult<HashSet<String>> {
        let forwarded: Vec<Order> = self.store.get_list(StoreKey::PaidOrders)?;
        Ok(occupied_table_ids(&forwarded))
    }

    fn find_table(table_id: &str) -> SessionResult<DiningTable> {
        DiningTable::all()
            .into_iter()
            .find(|t| t.id == table_id)
            .ok_or_else(|| SessionError::TableNotFound(table_id.to_string()))
    }

    /// Tick or untick a table on the selection screen
    ///
    /// Returns whether the table is selected afterwards. Unticking always
    /// works; ticking an occupied table fails with `TableOccupied`. Nothing
    /// is written until [`confirm_tables`](Self::confirm_tables).
    pub fn toggle_table(&self, selection: &mut TableSelection, table_id: &str) -> SessionResult<bool> {
        let table = Self::find_table(table_id)?;
        if let Some(idx) = selection.tables.iter().position(|t| t.id == table.id) {
            selection.tables.remove(idx);
            return Ok(false);
        }

        if self.occupied()?.contains(&table.id) {
            tracing::info!(table_id = %table.id, "Table already occupied");
            return Err(SessionError::TableOccupied(table.id));
        }
        selection.tables.push(table);
        Ok(true)
    }

    /// Bind the device to every selected table
    ///
    /// Occupancy is checked again inside the write transaction. The first
    /// table in tap order becomes `selectedTable`, which checkout uses.
    pub fn confirm_tables(&self, selection: &TableSelection) -> SessionResult<DiningTable> {
        let Some(primary) = selection.tables.first() else {
            return Err(SessionError::NoTableSelected);
        };

        self.store.transaction(|txn| -> SessionResult<()> {
            let forwarded: Vec<Order> = txn.get_list(StoreKey::PaidOrders)?;
            let occupied = occupied_table_ids(&forwarded);
            if let Some(taken) = selection.tables.iter().find(|t| occupied.contains(&t.id)) {
                return Err(SessionError::TableOccupied(taken.id.clone()));
            }

            let ids: Vec<&str> = selection.tables.iter().map(|t| t.id.as_str()).collect();
            let names: Vec<&str> = selection.tables.iter().map(|t| t.name.as_str()).collect();
            txn.set(StoreKey::SelectedTables, &ids)?;
            txn.set(StoreKey::SelectedTableNames, &names)?;
            txn.set(StoreKey::SelectedTable, &primary.id)?;
            txn.set(StoreKey::SelectedTableName, &primary.name)?;
            Ok(())
        })?;

        tracing::info!(
            table_id = %primary.id,
            table_count = selection.len(),
            "Tables selected"
        );
        Ok(primary.clone())
    }

    /// Bind the device to a single free table
    pub fn select_table(&self, table_id: &str) -> SessionResult<DiningTable> {
        let mut selection = TableSelection::default();
        self.toggle_table(&mut selection, table_id)?;
        self.confirm_tables(&selection)
    }

    pub fn selected_table(&self) -> SessionResult<Option<DiningTable>> {
        let id: Option<String> = self.store.get(StoreKey::SelectedTable)?;
        let name: Option<String> = self.store.get(StoreKey::SelectedTableName)?;
        Ok(id.map(|id| DiningTable {
            name: name.unwrap_or_else(|| id.clone()),
            id,
        }))
    }

    /// Every confirmed table; a device holding only `selectedTable` yields
    /// that one
    pub fn selected_tables(&self) -> SessionResult<Vec<DiningTable>> {
        let ids: Vec<String> = self.store.get_list(StoreKey::SelectedTables)?;
        if ids.is_empty() {
            return Ok(self.selected_table()?.into_iter().collect());
        }

        let mut names: Vec<String> = self.store.get_list(StoreKey::SelectedTableNames)?;
        names.resize(ids.len(), String::new());
        Ok(ids
            .into_iter()
            .zip(names)
            .map(|(id, name)| DiningTable {
                name: if name.is_empty() { id.clone() } else { name },
                id,
            })
            .collect())
    }
}

/// Tables ticked on the selection screen, in tap order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelection {
    tables: Vec<DiningTable>,
}

impl TableSelection {
    pub fn tables(&self) -> &[DiningTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, table_id: &str) -> bool {
        self.tables.iter().any(|t| t.id == table_id)
    }
}
