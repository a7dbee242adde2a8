// Transport double that answers from scripted responses.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use wxpay_connector::config::MerchantConfig;
use wxpay_connector::core::TransportErrorKind;
use wxpay_connector::gateways::services::wire;
use wxpay_connector::gateways::{PostOptions, Transport, REPORT_URL};
use wxpay_connector::{AppError, ParamSet, Result};

/// One request the code under test tried to send
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub body: String,
    pub params: ParamSet,
    pub timeout: Duration,
}

enum Scripted {
    Body(String),
    Fail(TransportErrorKind),
}

/// Records every post. Unscripted report calls succeed; any other
/// unscripted call fails with a connect error.
#[derive(Default)]
pub struct RecordingTransport {
    scripted: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body for the next post to `url`
    pub fn respond(&self, url: &str, body: impl Into<String>) -> &Self {
        self.push(url, Scripted::Body(body.into()))
    }

    /// Queue a transport failure for the next post to `url`
    pub fn fail(&self, url: &str, kind: TransportErrorKind) -> &Self {
        self.push(url, Scripted::Fail(kind))
    }

    fn push(&self, url: &str, scripted: Scripted) -> &Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(scripted);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.url == url).collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post(
        &self,
        body: String,
        url: &str,
        options: &PostOptions,
        _config: &MerchantConfig,
    ) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            params: wire::from_xml(body.as_bytes()).unwrap(),
            body,
            timeout: options.timeout,
        });

        let next = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Body(body)) => Ok(body.into_bytes()),
            Some(Scripted::Fail(kind)) => Err(AppError::transport(kind, "scripted failure")),
            None if url == REPORT_URL => {
                Ok(b"<xml><return_code>SUCCESS</return_code></xml>".to_vec())
            }
            None => Err(AppError::transport(
                TransportErrorKind::Connect,
                format!("no response scripted for {}", url),
            )),
        }
    }
}
