//! Data models
//!
//! Every record here is stored as JSON in the device store, with camelCase
//! field names matching the keys the app has always written.

pub mod cart;
pub mod combo;
pub mod dining_table;
pub mod dish;
pub mod message;
pub mod notification;
pub mod order;
pub mod staff;

// Re-exports
pub use cart::*;
pub use combo::*;
pub use dining_table::*;
pub use dish::*;
pub use message::*;
pub use notification::*;
pub use order::*;
pub use staff::*;
