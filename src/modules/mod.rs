pub mod gateways;
pub mod notifications;
