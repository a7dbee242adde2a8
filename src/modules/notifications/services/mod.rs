pub mod notify_handler;

pub use notify_handler::{NotificationConsumer, NotifyHandler};
