pub mod order_service;
pub mod response_parser;
pub mod signer;
pub mod telemetry;
pub mod transport;
pub mod wire;

pub use order_service::{OrderService, DEFAULT_TIMEOUT, ORDER_QUERY_URL, UNIFIED_ORDER_URL};
pub use response_parser::parse_response;
pub use signer::{sign, sign_with, verify, verify_with, SignType};
pub use telemetry::{ReportLevel, REPORT_URL};
pub use transport::{HttpTransport, PostOptions, Transport};
