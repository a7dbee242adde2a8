//! WeChat Pay merchant connector
//!
//! Signs and posts XML requests to the gateway, verifies signed responses, and
//! gates inbound payment notifications behind a signature check and an
//! independent order query before merchant code sees them.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use config::MerchantConfig;
pub use crate::core::{AppError, ParamSet, ParamValue, Result};
pub use modules::gateways;
pub use modules::notifications;
