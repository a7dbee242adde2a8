use crate::core::{AppError, ReportLevel, Result, SignType};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Host value meaning "no proxy configured"
pub const NO_PROXY_HOST: &str = "0.0.0.0";

/// Produces the random `nonce_str` attached to every request
pub trait NonceGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// 32-character nonce taken from a random UUID
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNonce;

impl NonceGenerator for UuidNonce {
    fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Outbound proxy; `0.0.0.0` or port `0` means none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: NO_PROXY_HOST.to_string(),
            port: 0,
        }
    }
}

impl ProxyConfig {
    pub fn is_enabled(&self) -> bool {
        !self.host.is_empty() && self.host != NO_PROXY_HOST && self.port != 0
    }

    /// Proxy URL, or `None` when disabled
    pub fn url(&self) -> Option<String> {
        self.is_enabled()
            .then(|| format!("http://{}:{}", self.host, self.port))
    }
}

/// Per-merchant secrets and settings, passed explicitly to every operation
#[derive(Clone)]
pub struct MerchantConfig {
    /// API secret used for signing
    pub api_key: String,
    pub mch_id: String,
    pub app_id: String,
    pub proxy: ProxyConfig,
    /// PEM client certificate
    pub ssl_cert_path: Option<PathBuf>,
    /// PEM client key
    pub ssl_key_path: Option<PathBuf>,
    pub report_level: ReportLevel,
    pub sign_type: SignType,
    /// Terminal IP sent as `spbill_create_ip` and in reports
    pub client_ip: String,
    pub nonce: Arc<dyn NonceGenerator>,
}

impl fmt::Debug for MerchantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantConfig")
            .field("api_key", &"<redacted>")
            .field("mch_id", &self.mch_id)
            .field("app_id", &self.app_id)
            .field("proxy", &self.proxy)
            .field("ssl_cert_path", &self.ssl_cert_path)
            .field("ssl_key_path", &self.ssl_key_path)
            .field("report_level", &self.report_level)
            .field("sign_type", &self.sign_type)
            .field("client_ip", &self.client_ip)
            .finish_non_exhaustive()
    }
}

impl MerchantConfig {
    pub fn new(
        api_key: impl Into<String>,
        mch_id: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            mch_id: mch_id.into(),
            app_id: app_id.into(),
            proxy: ProxyConfig::default(),
            ssl_cert_path: None,
            ssl_key_path: None,
            report_level: ReportLevel::default(),
            sign_type: SignType::default(),
            client_ip: "127.0.0.1".to_string(),
            nonce: Arc::new(UuidNonce),
        }
    }

    pub fn with_report_level(mut self, level: ReportLevel) -> Self {
        self.report_level = level;
        self
    }

    pub fn with_sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = sign_type;
        self
    }

    pub fn with_proxy(mut self, host: impl Into<String>, port: u16) -> Self {
        self.proxy = ProxyConfig {
            host: host.into(),
            port,
        };
        self
    }

    pub fn with_client_cert(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.ssl_cert_path = Some(cert.into());
        self.ssl_key_path = Some(key.into());
        self
    }

    pub fn with_nonce(mut self, nonce: Arc<dyn NonceGenerator>) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn nonce_str(&self) -> String {
        self.nonce.generate()
    }

    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            env::var(name).map_err(|_| AppError::Configuration(format!("{} not set", name)))
        };
        let optional_path = |name: &str| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };

        Ok(MerchantConfig {
            api_key: required("WXPAY_API_KEY")?,
            mch_id: required("WXPAY_MCH_ID")?,
            app_id: required("WXPAY_APP_ID")?,
            proxy: ProxyConfig {
                host: env::var("WXPAY_PROXY_HOST").unwrap_or_else(|_| NO_PROXY_HOST.to_string()),
                port: env::var("WXPAY_PROXY_PORT")
                    .unwrap_or_else(|_| "0".to_string())
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid WXPAY_PROXY_PORT".to_string()))?,
            },
            ssl_cert_path: optional_path("WXPAY_SSL_CERT_PATH"),
            ssl_key_path: optional_path("WXPAY_SSL_KEY_PATH"),
            report_level: env::var("WXPAY_REPORT_LEVEL")
                .unwrap_or_else(|_| "1".to_string())
                .parse()?,
            sign_type: env::var("WXPAY_SIGN_TYPE")
                .unwrap_or_else(|_| "MD5".to_string())
                .parse()?,
            client_ip: env::var("WXPAY_CLIENT_IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            nonce: Arc::new(UuidNonce),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(AppError::Configuration("API key must not be empty".to_string()));
        }

        if self.mch_id.is_empty() || self.app_id.is_empty() {
            return Err(AppError::Configuration(
                "Merchant id and app id must not be empty".to_string(),
            ));
        }

        if self.ssl_cert_path.is_some() != self.ssl_key_path.is_some() {
            return Err(AppError::Configuration(
                "Client certificate and key paths must be set together".to_string(),
            ));
        }

        Ok(())
    }
}
