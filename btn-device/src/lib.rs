//! BTN Restaurant device node
//!
//! Business logic of one ordering device: guests browse the menu, fill a
//! cart and check out; order receivers confirm or cancel payments; waiters
//! serve forwarded orders and message their tables. State lives in a
//! device-local store of JSON values.
//!
//! # Module structure
//!
//! ```text
//! btn-device/src/
//! ├── core/           # config, staff directory, AppContext
//! ├── store/          # redb key/value store
//! ├── catalog/        # static menu
//! ├── cart/           # guest cart
//! ├── orders/         # order lifecycle
//! ├── messaging/      # waiter <-> table messages
//! ├── notifications/  # notifier seam, history, daily reminders
//! ├── session/        # login, roles, table selection
//! ├── stats/          # statistics and recommendation views
//! ├── assistant/      # text generator with key rotation
//! └── utils/          # logging
//! ```

pub mod assistant;
pub mod cart;
pub mod catalog;
pub mod core;
pub mod messaging;
pub mod notifications;
pub mod orders;
pub mod session;
pub mod stats;
pub mod store;
pub mod utils;

// Re-exports
pub use core::{AppContext, Config, ContextError, StaffDirectory};
pub use store::{DeviceStore, StoreError, StoreKey};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, then initialize logging from the environment
///
/// Reads `LOG_LEVEL`, `LOG_JSON` and `LOG_DIR`; a missing `.env` is fine.
pub fn setup_environment() -> anyhow::Result<()> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(anyhow::anyhow!("Failed to load .env: {}", e));
    }

    let config = Config::from_env();
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  _________   __
   / __ )/_  __/ | / /
  / __  | / / /  |/ /
 / /_/ / / / / /|  /
/_____/ /_/ /_/ |_/
   restaurant device
    "#
    );
}
