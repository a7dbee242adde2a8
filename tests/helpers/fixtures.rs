// Merchant configuration and signed gateway payloads for tests.

use std::sync::Arc;
use wxpay_connector::config::{MerchantConfig, NonceGenerator};
use wxpay_connector::gateways::services::{signer, wire};
use wxpay_connector::gateways::ReportLevel;
use wxpay_connector::ParamSet;

pub const API_KEY: &str = "8934e7d15453e97507ef794cf7b0519d";
pub const MCH_ID: &str = "10000100";
pub const APP_ID: &str = "wx2421b1c4370ec43b";
pub const NONCE: &str = "5K8264ILTKCH16CQ2502SI8ZNMTM67VS";
pub const TRANSACTION_ID: &str = "1004400740201409030005092168";
pub const OUT_TRADE_NO: &str = "1409811653";

/// Nonce generator returning a fixed value
pub struct FixedNonce(pub &'static str);

impl NonceGenerator for FixedNonce {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

/// Merchant configuration that never reports and uses a fixed nonce
pub fn merchant_config() -> MerchantConfig {
    MerchantConfig::new(API_KEY, MCH_ID, APP_ID)
        .with_nonce(Arc::new(FixedNonce(NONCE)))
        .with_report_level(ReportLevel::Never)
}

pub fn params(pairs: &[(&str, &str)]) -> ParamSet {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

/// Sign `params` with `key` and encode them as the gateway would
pub fn signed_xml(mut params: ParamSet, key: &str) -> String {
    let sign = signer::sign(&params, key);
    params.insert("sign", sign);
    wire::to_xml(&params).unwrap()
}

/// Complete unified order request for `trade_type`
pub fn order_params(trade_type: &str) -> ParamSet {
    params(&[
        ("out_trade_no", OUT_TRADE_NO),
        ("body", "Tencent-Game"),
        ("total_fee", "1"),
        ("trade_type", trade_type),
        ("notify_url", "https://merchant.example.com/wxpay/notify"),
    ])
}

/// Signed unified order success response
pub fn unified_order_success() -> String {
    signed_xml(
        params(&[
            ("return_code", "SUCCESS"),
            ("return_msg", "OK"),
            ("appid", APP_ID),
            ("mch_id", MCH_ID),
            ("nonce_str", "IITRi8Iabbblz1Jc"),
            ("result_code", "SUCCESS"),
            ("prepay_id", "wx201411101639507cbf6ffd8b0779950874"),
            ("trade_type", "JSAPI"),
        ]),
        API_KEY,
    )
}

/// Signed order query response with the given business status
pub fn order_query_response(result_code: &str, trade_state: &str) -> String {
    signed_xml(
        params(&[
            ("return_code", "SUCCESS"),
            ("return_msg", "OK"),
            ("appid", APP_ID),
            ("mch_id", MCH_ID),
            ("nonce_str", "ZS8vLhVLlUgqMPf8"),
            ("result_code", result_code),
            ("transaction_id", TRANSACTION_ID),
            ("out_trade_no", OUT_TRADE_NO),
            ("trade_state", trade_state),
            ("total_fee", "1"),
        ]),
        API_KEY,
    )
}

/// Payment notification fields as the gateway pushes them, unsigned
pub fn notification_params() -> ParamSet {
    params(&[
        ("appid", APP_ID),
        ("bank_type", "CFT"),
        ("cash_fee", "1"),
        ("fee_type", "CNY"),
        ("is_subscribe", "Y"),
        ("mch_id", MCH_ID),
        ("nonce_str", "5d2b6c2a8db53831f7eda20af46e531c"),
        ("openid", "oUpF8uMEb4qRXf22hE3X68TekukE"),
        ("out_trade_no", OUT_TRADE_NO),
        ("result_code", "SUCCESS"),
        ("return_code", "SUCCESS"),
        ("time_end", "20140903131540"),
        ("total_fee", "1"),
        ("trade_type", "JSAPI"),
        ("transaction_id", TRANSACTION_ID),
    ])
}
