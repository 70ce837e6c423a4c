//! Core - configuration, staff directory and the application context
//!
//! - [`Config`] - device configuration
//! - [`StaffDirectory`] - staff accounts and waiter sections
//! - [`AppContext`] - store plus every service, built once at startup

pub mod config;
pub mod context;
pub mod staff;

pub use config::Config;
pub use context::{AppContext, ContextError};
pub use staff::{StaffConfigError, StaffDirectory};
