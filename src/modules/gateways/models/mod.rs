pub mod gateway_response;

pub use gateway_response::{GatewayResponse, OrderQuery, SignatureCheck, SUCCESS};
