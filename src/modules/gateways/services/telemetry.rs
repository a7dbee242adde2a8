use crate::config::MerchantConfig;
use crate::core::{AppError, ParamSet, Result};
use crate::modules::gateways::models::GatewayResponse;
use crate::modules::gateways::services::signer::{self, SignType, SIGN_FIELD, SIGN_TYPE_FIELD};
use crate::modules::gateways::services::transport::{PostOptions, Transport};
use crate::modules::gateways::services::wire;
use std::time::Duration;
use tracing::debug;

pub use crate::core::options::ReportLevel;

/// Call-latency report endpoint
pub const REPORT_URL: &str = "https://api.mch.weixin.qq.com/payitil/report";

pub const REPORT_TIMEOUT: Duration = Duration::from_secs(1);

/// Response fields copied into a report when present
const REPORTED_FIELDS: [&str; 7] = [
    "return_code",
    "return_msg",
    "result_code",
    "err_code",
    "err_code_des",
    "out_trade_no",
    "device_info",
];

const REQUIRED_FIELDS: [&str; 4] = ["interface_url", "return_code", "result_code", "execute_time_"];

/// Apply the report policy to a call outcome.
///
/// Level 1 only skips calls whose top-level and business status both read
/// `SUCCESS`; local failures and malformed responses are reported.
pub fn should_report(level: ReportLevel, outcome: &Result<GatewayResponse>) -> bool {
    match level {
        ReportLevel::Never => false,
        ReportLevel::FailuresOnly => {
            !matches!(outcome, Ok(response) if response.is_business_success())
        }
        ReportLevel::Always => true,
    }
}

/// Assemble the report body for one call
pub fn build_report(
    interface_url: &str,
    elapsed_ms: i64,
    outcome: &Result<GatewayResponse>,
) -> ParamSet {
    let mut report = ParamSet::new();
    report.insert("interface_url", interface_url);
    report.insert("execute_time_", elapsed_ms);

    if let Ok(response) = outcome {
        for field in REPORTED_FIELDS {
            if let Some(value) = response.params.get(field) {
                report.insert(field, value.clone());
            }
        }
    }

    report
}

/// Send a latency report.
///
/// Merchant fields, timestamp, nonce and signature are filled in here.
pub async fn report(
    transport: &dyn Transport,
    mut params: ParamSet,
    config: &MerchantConfig,
) -> Result<()> {
    for field in REQUIRED_FIELDS {
        if !params.has(field) {
            return Err(AppError::validation(format!(
                "Report is missing required field {}",
                field
            )));
        }
    }

    params.insert("appid", config.app_id.as_str());
    params.insert("mch_id", config.mch_id.as_str());
    params.insert("user_ip", config.client_ip.as_str());
    params.insert("time", chrono::Local::now().format("%Y%m%d%H%M%S").to_string());
    params.insert("nonce_str", config.nonce_str());
    if config.sign_type != SignType::Md5 {
        params.insert(SIGN_TYPE_FIELD, config.sign_type.as_str());
    }
    params.remove(SIGN_FIELD);
    let sign = signer::sign_with(&params, &config.api_key, config.sign_type)?;
    params.insert(SIGN_FIELD, sign);

    let body = wire::to_xml(&params)?;
    transport
        .post(body, REPORT_URL, &PostOptions::new(REPORT_TIMEOUT), config)
        .await?;

    Ok(())
}

/// Report a finished call according to the merchant's level.
/// Never fails: report errors are logged and dropped.
pub async fn report_call(
    transport: &dyn Transport,
    interface_url: &str,
    elapsed: Duration,
    outcome: &Result<GatewayResponse>,
    config: &MerchantConfig,
) {
    if !should_report(config.report_level, outcome) {
        return;
    }

    let elapsed_ms = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
    let params = build_report(interface_url, elapsed_ms, outcome);

    if let Err(e) = report(transport, params, config).await {
        debug!(interface_url = %interface_url, error = %e, "Call report dropped");
    }
}
