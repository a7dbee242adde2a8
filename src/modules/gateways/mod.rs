pub mod models;
pub mod services;

pub use models::{GatewayResponse, OrderQuery, SignatureCheck};
pub use services::{
    HttpTransport, OrderService, PostOptions, ReportLevel, SignType, Transport, DEFAULT_TIMEOUT,
    ORDER_QUERY_URL, REPORT_URL, UNIFIED_ORDER_URL,
};
