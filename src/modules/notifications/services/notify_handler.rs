use crate::config::MerchantConfig;
use crate::core::{AppError, ParamSet, Result};
use crate::modules::gateways::models::SignatureCheck;
use crate::modules::gateways::services::{parse_response, OrderService, DEFAULT_TIMEOUT};
use crate::modules::notifications::models::{NotifyOutcome, NotifyReply, NotifyState};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Merchant logic run on a verified payment notification.
///
/// The gateway redelivers on timeout (about 2 seconds) or on a failure reply,
/// so implementations must be idempotent.
#[async_trait]
pub trait NotificationConsumer: Send + Sync {
    type Output: Send;

    async fn on_verified(
        &self,
        notification: &ParamSet,
        config: &MerchantConfig,
    ) -> Result<Self::Output>;
}

/// Verifies inbound notifications before handing them to a consumer
#[derive(Clone)]
pub struct NotifyHandler {
    orders: OrderService,
    query_timeout: Duration,
}

impl NotifyHandler {
    pub fn new(orders: OrderService) -> Self {
        Self {
            orders,
            query_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Run one notification through signature check, order re-query and
    /// the consumer. Always produces a reply for the gateway.
    pub async fn handle<C>(
        &self,
        raw: &[u8],
        config: &MerchantConfig,
        consumer: &C,
    ) -> NotifyOutcome<C::Output>
    where
        C: NotificationConsumer + ?Sized,
    {
        let mut states = vec![NotifyState::Received];

        let checked = check_signature(raw, config);
        states.push(NotifyState::SignatureChecked);

        let payload = match checked {
            Ok(payload) => payload,
            Err(reason) => {
                warn!(error = %reason, "Notification rejected at signature check");
                return NotifyOutcome::rejected(states, reason);
            }
        };

        if let Err(reason) = self.confirm_order(&payload, config).await {
            warn!(error = %reason, "Notification rejected at order confirmation");
            return NotifyOutcome::rejected(states, reason);
        }
        states.push(NotifyState::OrderVerified);

        let result = consumer.on_verified(&payload, config).await;
        let reply = match &result {
            Ok(_) => NotifyReply::success(),
            Err(e) => {
                warn!(error = %e, "Notification consumer failed, gateway will redeliver");
                NotifyReply::fail(e.to_string())
            }
        };
        states.push(NotifyState::Replied);

        NotifyOutcome {
            states,
            reply,
            result,
        }
    }

    /// Re-query the order; a successful reply must carry a valid signature
    /// and both status fields must report success
    async fn confirm_order(&self, payload: &ParamSet, config: &MerchantConfig) -> Result<()> {
        let transaction_id = payload
            .value("transaction_id")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::validation("Notification has no transaction_id"))?;

        let response = self
            .orders
            .query_order(&transaction_id, config, self.query_timeout)
            .await?;

        // Failed top-level replies are unsigned; they fall through to the status check
        if response.is_return_success() && !response.is_trusted() {
            return Err(AppError::signature(format!(
                "Order query for {} returned an unverified reply ({:?})",
                transaction_id, response.signature,
            )));
        }

        if !response.is_business_success() {
            return Err(AppError::gateway(format!(
                "Order query for {} did not confirm the payment (return_code={}, result_code={})",
                transaction_id,
                response.return_code().unwrap_or("-"),
                response.result_code().unwrap_or("-"),
            )));
        }

        info!(transaction_id = %transaction_id, "Notification confirmed by order query");
        Ok(())
    }
}

/// Decode the notification and require a valid signature
fn check_signature(raw: &[u8], config: &MerchantConfig) -> Result<ParamSet> {
    let response = parse_response(raw, config)?;

    match response.signature {
        Some(SignatureCheck::Valid) => {
            debug!(fields = response.params.len(), "Notification signature valid");
            Ok(response.params)
        }
        Some(SignatureCheck::Invalid) => {
            Err(AppError::signature("Notification signature mismatch"))
        }
        Some(SignatureCheck::Missing) => Err(AppError::signature("Notification is not signed")),
        None => Err(AppError::gateway(format!(
            "Notification reports failure: {}",
            response.return_msg().unwrap_or("no message")
        ))),
    }
}
