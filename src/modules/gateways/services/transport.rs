use crate::config::MerchantConfig;
use crate::core::{AppError, Result, TransportErrorKind};
use crate::modules::gateways::services::wire;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Identity, Proxy};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-call transport settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostOptions {
    /// Attach the merchant's PEM client certificate
    pub use_client_cert: bool,
    pub timeout: Duration,
}

impl PostOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            use_client_cert: false,
            timeout,
        }
    }

    pub fn with_client_cert(mut self) -> Self {
        self.use_client_cert = true;
        self
    }
}

/// HTTPS POST of a wire payload
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post `body` to `url` and return the raw response bytes.
    ///
    /// Failures come back as `AppError::Transport`.
    async fn post(
        &self,
        body: String,
        url: &str,
        options: &PostOptions,
        config: &MerchantConfig,
    ) -> Result<Vec<u8>>;
}

/// reqwest-backed transport. Peer and host verification are always on.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }

    async fn build_client(options: &PostOptions, config: &MerchantConfig) -> Result<Client> {
        let mut builder = Client::builder().timeout(options.timeout).https_only(true);

        if let Some(proxy_url) = config.proxy.url() {
            let proxy = Proxy::all(&proxy_url).map_err(|e| {
                AppError::transport(
                    TransportErrorKind::Request,
                    format!("Invalid proxy {}: {}", proxy_url, e),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        if options.use_client_cert {
            builder = builder.identity(load_identity(config).await?);
        }

        builder.build().map_err(|e| {
            AppError::transport(
                TransportErrorKind::Request,
                format!("Failed to build HTTP client: {}", e),
            )
        })
    }
}

async fn read_pem(path: Option<&Path>, what: &str) -> Result<Vec<u8>> {
    let path = path.ok_or_else(|| {
        AppError::transport(
            TransportErrorKind::Certificate,
            format!("Client {} path not configured", what),
        )
    })?;

    tokio::fs::read(path).await.map_err(|e| {
        AppError::transport(
            TransportErrorKind::Certificate,
            format!("Failed to read client {} {}: {}", what, path.display(), e),
        )
    })
}

/// Combine the separate certificate and key PEM files into one identity
async fn load_identity(config: &MerchantConfig) -> Result<Identity> {
    let mut pem = read_pem(config.ssl_cert_path.as_deref(), "certificate").await?;
    pem.push(b'\n');
    pem.extend(read_pem(config.ssl_key_path.as_deref(), "key").await?);

    Identity::from_pem(&pem).map_err(|e| {
        AppError::transport(
            TransportErrorKind::Certificate,
            format!("Invalid client certificate: {}", e),
        )
    })
}

fn classify(url: &str, e: reqwest::Error) -> AppError {
    let kind = if e.is_timeout() {
        TransportErrorKind::Timeout
    } else if e.is_connect() {
        TransportErrorKind::Connect
    } else if e.is_body() || e.is_decode() {
        TransportErrorKind::Body
    } else {
        TransportErrorKind::Request
    };

    AppError::transport(kind, format!("POST {} failed: {}", url, e))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        body: String,
        url: &str,
        options: &PostOptions,
        config: &MerchantConfig,
    ) -> Result<Vec<u8>> {
        let client = Self::build_client(options, config).await?;

        debug!(url = %url, proxy = config.proxy.is_enabled(), "Posting to gateway");

        let response = client
            .post(url)
            .header(CONTENT_TYPE, wire::CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| classify(url, e))?;

        if !status.is_success() {
            // The body still goes to the parser, which decides what it means
            warn!(url = %url, status = status.as_u16(), "Gateway returned non-success HTTP status");
        }

        Ok(bytes.to_vec())
    }
}
