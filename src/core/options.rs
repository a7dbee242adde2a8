use crate::core::{AppError, ParamSet, Result};
use std::fmt;
use std::str::FromStr;

/// Field announcing the algorithm of a payload's signature
pub const SIGN_TYPE_FIELD: &str = "sign_type";

/// Signature algorithm accepted by the gateway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignType {
    #[default]
    Md5,
    HmacSha256,
}

impl SignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Md5 => "MD5",
            SignType::HmacSha256 => "HMAC-SHA256",
        }
    }

    /// Algorithm declared by `params`, falling back to `default` when absent
    pub fn declared_in(params: &ParamSet, default: SignType) -> SignType {
        params
            .text(SIGN_TYPE_FIELD)
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MD5" => Ok(SignType::Md5),
            "HMAC-SHA256" => Ok(SignType::HmacSha256),
            other => Err(AppError::Configuration(format!(
                "Unsupported sign type: {}",
                other
            ))),
        }
    }
}

/// When call reports are sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportLevel {
    /// 0: never
    Never,
    /// 1: unless both status fields report success
    #[default]
    FailuresOnly,
    /// 2: every call
    Always,
}

impl TryFrom<u8> for ReportLevel {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ReportLevel::Never),
            1 => Ok(ReportLevel::FailuresOnly),
            2 => Ok(ReportLevel::Always),
            other => Err(AppError::Configuration(format!(
                "Report level must be 0, 1 or 2, got {}",
                other
            ))),
        }
    }
}

impl FromStr for ReportLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let level: u8 = s
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid report level: {}", s)))?;
        ReportLevel::try_from(level)
    }
}
