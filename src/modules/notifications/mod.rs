pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::{configure, WebhookState};
pub use models::{NotifyOutcome, NotifyReply, NotifyState};
pub use services::{NotificationConsumer, NotifyHandler};
