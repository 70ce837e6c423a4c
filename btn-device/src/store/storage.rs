//! redb-based device store
//!
//! One table, `kv`, maps each [`StoreKey`] to a JSON-encoded value. Lists are
//! stored whole: every mutation reads the list, changes it in memory and
//! writes it back.
//!
//! # Atomicity
//!
//! Each read-modify-write runs inside a single redb write transaction. redb
//! admits one writer at a time, so two handlers firing close together on the
//! same device are serialized instead of overwriting each other. Operations
//! that touch several keys (payment confirmation moves an order across three
//! lists) use [`DeviceStore::transaction`] so the lists commit together or
//! not at all.

use super::keys::StoreKey;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Key/value table: key = store key, value = JSON bytes
const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Device-local store backed by redb
#[derive(Clone)]
pub struct DeviceStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for DeviceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStore").finish_non_exhaustive()
    }
}

impl DeviceStore {
    /// Open or create the store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open a store that lives only in memory (tests, demos)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    // ========== Reads ==========

    /// Read and decode a value; `None` when the key was never written
    pub fn get<T: DeserializeOwned>(&self, key: StoreKey) -> StoreResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;

        match table.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Read a list value; a missing key reads as an empty list
    pub fn get_list<T: DeserializeOwned>(&self, key: StoreKey) -> StoreResult<Vec<T>> {
        Ok(self.get::<Vec<T>>(key)?.unwrap_or_default())
    }

    /// Whether the key holds a value
    pub fn contains(&self, key: StoreKey) -> StoreResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        Ok(table.get(key.as_str())?.is_some())
    }

    // ========== Writes ==========

    /// Overwrite a value
    pub fn set<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> StoreResult<()> {
        self.transaction(|txn| txn.set(key, value))
    }

    /// Delete a key
    pub fn remove(&self, key: StoreKey) -> StoreResult<()> {
        self.transaction(|txn| txn.remove(key))
    }

    /// Delete several keys in one commit
    pub fn remove_many(&self, keys: &[StoreKey]) -> StoreResult<()> {
        self.transaction(|txn| {
            for key in keys {
                txn.remove(*key)?;
            }
            Ok(())
        })
    }

    /// Read-modify-write a list in one transaction
    ///
    /// The closure's return value is passed through.
    pub fn update_list<T, R>(
        &self,
        key: StoreKey,
        f: impl FnOnce(&mut Vec<T>) -> R,
    ) -> StoreResult<R>
    where
        T: Serialize + DeserializeOwned,
    {
        self.transaction(|txn| {
            let mut list: Vec<T> = txn.get_list(key)?;
            let out = f(&mut list);
            txn.set(key, &list)?;
            Ok(out)
        })
    }

    /// Run `f` inside one write transaction
    ///
    /// Commits when `f` returns `Ok`, aborts when it returns `Err`, so a
    /// failed operation leaves every key as it was.
    pub fn transaction<R, E>(&self, f: impl FnOnce(&StoreTxn<'_>) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let txn = self.db.begin_write().map_err(StoreError::from)?;
        match f(&StoreTxn { txn: &txn }) {
            Ok(value) => {
                txn.commit().map_err(StoreError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = txn.abort() {
                    tracing::warn!(error = %abort_err, "Failed to abort device store transaction");
                }
                Err(e)
            }
        }
    }
}

/// Handle to an open write transaction
pub struct StoreTxn<'a> {
    txn: &'a WriteTransaction,
}

impl StoreTxn<'_> {
    pub fn get<T: DeserializeOwned>(&self, key: StoreKey) -> StoreResult<Option<T>> {
        let table = self.txn.open_table(KV_TABLE)?;

        match table.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_list<T: DeserializeOwned>(&self, key: StoreKey) -> StoreResult<Vec<T>> {
        Ok(self.get::<Vec<T>>(key)?.unwrap_or_default())
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> StoreResult<()> {
        let mut table = self.txn.open_table(KV_TABLE)?;
        let value = serde_json::to_vec(value)?;
        table.insert(key.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn remove(&self, key: StoreKey) -> StoreResult<()> {
        let mut table = self.txn.open_table(KV_TABLE)?;
        table.remove(key.as_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_as_none() {
        let store = DeviceStore::open_in_memory().unwrap();
        assert_eq!(store.get::<String>(StoreKey::SelectedTable).unwrap(), None);
        assert!(!store.contains(StoreKey::SelectedTable).unwrap());
    }

    #[test]
    fn test_missing_list_reads_as_empty() {
        let store = DeviceStore::open_in_memory().unwrap();
        let list: Vec<u32> = store.get_list(StoreKey::Orders).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_set_get_remove() {
        let store = DeviceStore::open_in_memory().unwrap();

        store.set(StoreKey::SelectedTable, "table_4").unwrap();
        assert_eq!(
            store.get::<String>(StoreKey::SelectedTable).unwrap(),
            Some("table_4".to_string())
        );

        store.set(StoreKey::SelectedTable, "table_5").unwrap();
        assert_eq!(
            store.get::<String>(StoreKey::SelectedTable).unwrap(),
            Some("table_5".to_string())
        );

        store.remove(StoreKey::SelectedTable).unwrap();
        assert!(!store.contains(StoreKey::SelectedTable).unwrap());
    }

    #[test]
    fn test_remove_many() {
        let store = DeviceStore::open_in_memory().unwrap();
        store.set(StoreKey::Username, "waiter1").unwrap();
        store.set(StoreKey::Role, "waiter").unwrap();
        store.set(StoreKey::SelectedTable, "table_1").unwrap();

        store
            .remove_many(&[StoreKey::Username, StoreKey::Role])
            .unwrap();

        assert!(!store.contains(StoreKey::Username).unwrap());
        assert!(!store.contains(StoreKey::Role).unwrap());
        assert!(store.contains(StoreKey::SelectedTable).unwrap());
    }

    #[test]
    fn test_update_list_passes_result_through() {
        let store = DeviceStore::open_in_memory().unwrap();

        let len = store
            .update_list(StoreKey::History, |list: &mut Vec<u32>| {
                list.push(1);
                list.push(2);
                list.len()
            })
            .unwrap();
        assert_eq!(len, 2);

        store
            .update_list(StoreKey::History, |list: &mut Vec<u32>| list.retain(|v| *v != 1))
            .unwrap();
        assert_eq!(store.get_list::<u32>(StoreKey::History).unwrap(), vec![2]);
    }

    #[test]
    fn test_concurrent_update_list() {
        let store = DeviceStore::open_in_memory().unwrap();
        std::thread::scope(|scope| {
            for t in 0..4u32 {
                let store = store.clone();
                scope.spawn(move || {
                    for n in 0..25u32 {
                        store
                            .update_list(StoreKey::History, |list: &mut Vec<u32>| list.push(t * 100 + n))
                            .unwrap();
                    }
                });
            }
        });

        let mut list: Vec<u32> = store.get_list(StoreKey::History).unwrap();
        list.sort_unstable();
        let expected: Vec<u32> = (0..4u32).flat_map(|t| (0..25).map(move |n| t * 100 + n)).collect();
        assert_eq!(list, expected);
    }

    #[test]
    fn test_failed_transaction_leaves_store_untouched() {
        #[derive(Debug)]
        enum TestError {
            Store,
            Rejected,
        }
        impl From<StoreError> for TestError {
            fn from(_: StoreError) -> Self {
                TestError::Store
            }
        }

        let store = DeviceStore::open_in_memory().unwrap();
        store.set(StoreKey::Orders, &vec![1u32]).unwrap();

        let result: Result<(), TestError> = store.transaction(|txn| {
            txn.set(StoreKey::Orders, &Vec::<u32>::new())?;
            txn.set(StoreKey::PaidOrders, &vec![1u32])?;
            Err(TestError::Rejected)
        });
        assert!(matches!(result, Err(TestError::Rejected)));

        assert_eq!(store.get_list::<u32>(StoreKey::Orders).unwrap(), vec![1]);
        assert!(!store.contains(StoreKey::PaidOrders).unwrap());
    }

    #[test]
    fn test_values_are_plain_json() {
        let store = DeviceStore::open_in_memory().unwrap();
        store.set(StoreKey::IsGuest, &true).unwrap();
        let raw: serde_json::Value = store.get(StoreKey::IsGuest).unwrap().unwrap();
        assert_eq!(raw, serde_json::Value::Bool(true));
    }

    #[test]
    fn test_reopen_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.redb");
        {
            let store = DeviceStore::open(&path).unwrap();
            store.set(StoreKey::NameUser, "Nhân viên phục vụ A").unwrap();
        }
        let store = DeviceStore::open(&path).unwrap();
        assert_eq!(
            store.get::<String>(StoreKey::NameUser).unwrap(),
            Some("Nhân viên phục vụ A".to_string())
        );
    }
}
