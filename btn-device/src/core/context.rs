use super::{Config, StaffConfigError, StaffDirectory};
use crate::assistant::{Assistant, TextGenerator};
use crate::cart::CartManager;
use crate::catalog::Catalog;
use crate::messaging::MessagingService;
use crate::notifications::{NotificationCenter, Notifier, TracingNotifier};
use crate::orders::OrderLifecycle;
use crate::session::SessionService;
use crate::store::{DeviceStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to create work directory {path}: {source}")]
    WorkDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open device store: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Staff(#[from] StaffConfigError),

    #[error("Failed to load catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

/// Everything a device needs, built once at startup
///
/// Services share one [`DeviceStore`] handle. Clone is cheap: every field is
/// a handle or an `Arc`.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub store: DeviceStore,
    pub staff: Arc<StaffDirectory>,
    pub catalog: Arc<Catalog>,
    pub notifications: NotificationCenter,
    pub cart: CartManager,
    pub orders: OrderLifecycle,
    pub messaging: MessagingService,
    pub session: SessionService,
    assistant_keys: Vec<String>,
}

impl AppContext {
    /// Build the context from configuration
    ///
    /// 1. Work directory
    /// 2. Device store
    /// 3. Staff directory and catalog
    /// 4. Services
    pub fn initialize(config: &Config) -> Result<Self, ContextError> {
        std::fs::create_dir_all(&config.work_dir).map_err(|source| ContextError::WorkDir {
            path: config.work_dir.clone(),
            source,
        })?;

        let store_path = config.store_path();
        let store = DeviceStore::open(&store_path)?;
        tracing::info!(path = %store_path.display(), "Device store opened");

        let staff = config.load_staff()?;
        let catalog = Catalog::load()?;

        Ok(Self::assemble(
            store,
            staff,
            catalog,
            Arc::new(TracingNotifier),
            config.assistant_keys.clone(),
        ))
    }

    /// Context over an existing store with the stock staff and menu
    pub fn with_store(store: DeviceStore, notifier: Arc<dyn Notifier>) -> Result<Self, ContextError> {
        Ok(Self::assemble(
            store,
            StaffDirectory::default(),
            Catalog::load()?,
            notifier,
            Vec::new(),
        ))
    }

    fn assemble(
        store: DeviceStore,
        staff: StaffDirectory,
        catalog: Catalog,
        notifier: Arc<dyn Notifier>,
        assistant_keys: Vec<String>,
    ) -> Self {
        let staff = Arc::new(staff);
        let notifications = NotificationCenter::new(store.clone(), notifier);

        Self {
            cart: CartManager::new(store.clone()),
            orders: OrderLifecycle::new(store.clone(), staff.clone(), notifications.clone()),
            messaging: MessagingService::new(store.clone(), notifications.clone()),
            session: SessionService::new(store.clone(), staff.clone()),
            notifications,
            catalog: Arc::new(catalog),
            staff,
            store,
            assistant_keys,
        }
    }

    /// Assistant over the configured key pool
    pub fn assistant(&self, generator: Arc<dyn TextGenerator>) -> Assistant {
        Assistant::new(generator, self.assistant_keys.clone(), self.catalog.clone())
    }
}
