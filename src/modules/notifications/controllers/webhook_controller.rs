use crate::config::MerchantConfig;
use crate::modules::gateways::services::wire;
use crate::modules::notifications::models::NotifyReply;
use crate::modules::notifications::services::{NotificationConsumer, NotifyHandler};
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::info;

/// Shared, read-only state of the notification endpoint
pub struct WebhookState<C: ?Sized> {
    pub handler: NotifyHandler,
    pub config: MerchantConfig,
    pub consumer: Arc<C>,
}

impl<C: ?Sized> WebhookState<C> {
    pub fn new(handler: NotifyHandler, config: MerchantConfig, consumer: Arc<C>) -> Self {
        Self {
            handler,
            config,
            consumer,
        }
    }
}

/// Configure the notification route
///
/// POST /notify (with or without a trailing slash) receives the gateway's
/// raw XML body.
pub fn configure<C>(cfg: &mut web::ServiceConfig, state: web::Data<WebhookState<C>>)
where
    C: NotificationConsumer + ?Sized + 'static,
{
    cfg.service(
        web::resource(["/notify", "/notify/"])
            .app_data(state)
            .route(web::post().to(receive_notification::<C>)),
    );
}

/// Feed the raw body to the handler and write its reply back verbatim.
///
/// The HTTP status is always 200; the gateway reads `return_code`.
async fn receive_notification<C>(
    body: web::Bytes,
    state: web::Data<WebhookState<C>>,
) -> HttpResponse
where
    C: NotificationConsumer + ?Sized + 'static,
{
    info!(bytes = body.len(), "Received payment notification");

    let outcome = state
        .handler
        .handle(&body, &state.config, state.consumer.as_ref())
        .await;

    info!(
        verified = outcome.was_verified(),
        reply = %outcome.reply.return_code,
        "Notification replied"
    );

    xml_reply(&outcome.reply)
}

fn xml_reply(reply: &NotifyReply) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(wire::CONTENT_TYPE)
        .body(reply.to_xml())
}
