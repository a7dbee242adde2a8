use crate::config::MerchantConfig;
use crate::core::{AppError, ParamSet, Result};
use crate::modules::gateways::models::{GatewayResponse, OrderQuery};
use crate::modules::gateways::services::response_parser::parse_response;
use crate::modules::gateways::services::signer::{self, SignType, SIGN_FIELD, SIGN_TYPE_FIELD};
use crate::modules::gateways::services::telemetry;
use crate::modules::gateways::services::transport::{HttpTransport, PostOptions, Transport};
use crate::modules::gateways::services::wire;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Unified order endpoint
pub const UNIFIED_ORDER_URL: &str = "https://api.mch.weixin.qq.com/pay/unifiedorder";

/// Order query endpoint
pub const ORDER_QUERY_URL: &str = "https://api.mch.weixin.qq.com/pay/orderquery";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

const REQUIRED_ORDER_FIELDS: [&str; 5] =
    ["out_trade_no", "body", "total_fee", "trade_type", "notify_url"];

/// Check the fields the unified order endpoint requires, including the
/// ones that depend on `trade_type`.
pub fn validate_order_params(params: &ParamSet) -> Result<()> {
    for field in REQUIRED_ORDER_FIELDS {
        if !params.has(field) {
            return Err(AppError::validation(format!(
                "Unified order is missing required field {}",
                field
            )));
        }
    }

    if !params.int("total_fee").is_some_and(|fee| fee > 0) {
        return Err(AppError::validation(
            "Unified order total_fee must be a positive amount in fen",
        ));
    }

    match params.text("trade_type") {
        Some("JSAPI") if !params.has("openid") => Err(AppError::validation(
            "Unified order is missing openid, which is required when trade_type is JSAPI",
        )),
        Some("NATIVE") if !params.has("product_id") => Err(AppError::validation(
            "Unified order is missing product_id, which is required when trade_type is NATIVE",
        )),
        _ => Ok(()),
    }
}

/// Order operations against the gateway.
///
/// Holds no merchant state; each call takes its configuration explicitly.
#[derive(Clone)]
pub struct OrderService {
    transport: Arc<dyn Transport>,
}

impl OrderService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Service backed by the real HTTPS transport
    pub fn http() -> Self {
        Self::new(Arc::new(HttpTransport::new()))
    }

    /// Place a unified order.
    ///
    /// `appid`, `mch_id`, `nonce_str` and `spbill_create_ip` are taken from
    /// `config` unless already set.
    pub async fn create_order(
        &self,
        mut params: ParamSet,
        config: &MerchantConfig,
        timeout: Duration,
    ) -> Result<GatewayResponse> {
        validate_order_params(&params)?;

        params.insert_if_blank("appid", config.app_id.as_str());
        params.insert_if_blank("mch_id", config.mch_id.as_str());
        params.insert_if_blank("nonce_str", config.nonce_str());
        params.insert_if_blank("spbill_create_ip", config.client_ip.as_str());

        info!(
            out_trade_no = %params.value("out_trade_no").unwrap_or_default(),
            trade_type = %params.value("trade_type").unwrap_or_default(),
            "Creating unified order"
        );

        self.execute(UNIFIED_ORDER_URL, params, config, timeout).await
    }

    /// Look an order up by gateway transaction id
    pub async fn query_order(
        &self,
        transaction_id: &str,
        config: &MerchantConfig,
        timeout: Duration,
    ) -> Result<GatewayResponse> {
        self.query(&OrderQuery::TransactionId(transaction_id.to_string()), config, timeout)
            .await
    }

    /// Look an order up by either identifier
    pub async fn query(
        &self,
        query: &OrderQuery,
        config: &MerchantConfig,
        timeout: Duration,
    ) -> Result<GatewayResponse> {
        if query.id().trim().is_empty() {
            return Err(AppError::validation(format!(
                "Order query is missing required field {}",
                query.field()
            )));
        }

        let mut params = ParamSet::new();
        params.insert("appid", config.app_id.as_str());
        params.insert("mch_id", config.mch_id.as_str());
        params.insert(query.field(), query.id());
        params.insert("nonce_str", config.nonce_str());

        info!(field = query.field(), id = %query.id(), "Querying order");

        self.execute(ORDER_QUERY_URL, params, config, timeout).await
    }

    /// Sign, post, parse, then report the call
    async fn execute(
        &self,
        url: &str,
        mut params: ParamSet,
        config: &MerchantConfig,
        timeout: Duration,
    ) -> Result<GatewayResponse> {
        if config.sign_type != SignType::Md5 {
            params.insert(SIGN_TYPE_FIELD, config.sign_type.as_str());
        }
        params.remove(SIGN_FIELD);
        let sign = signer::sign_with(&params, &config.api_key, config.sign_type)?;
        params.insert(SIGN_FIELD, sign);
        let body = wire::to_xml(&params)?;

        let started = Instant::now();
        let outcome = match self
            .transport
            .post(body, url, &PostOptions::new(timeout), config)
            .await
        {
            Ok(raw) => parse_response(&raw, config),
            Err(e) => Err(e),
        };
        let elapsed = started.elapsed();

        match &outcome {
            Ok(response) => info!(
                url = %url,
                return_code = response.return_code().unwrap_or_default(),
                result_code = response.result_code().unwrap_or_default(),
                signature = ?response.signature,
                elapsed_ms = elapsed.as_millis() as u64,
                "Gateway call finished"
            ),
            Err(e) => error!(
                url = %url,
                error = %e,
                elapsed_ms = elapsed.as_millis() as u64,
                "Gateway call failed"
            ),
        }

        telemetry::report_call(self.transport.as_ref(), url, elapsed, &outcome, config).await;

        outcome
    }
}
