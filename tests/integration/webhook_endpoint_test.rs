// Integration tests for the POST /notify endpoint

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{test, web, App};
use async_trait::async_trait;
use helpers::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wxpay_connector::config::MerchantConfig;
use wxpay_connector::gateways::services::wire;
use wxpay_connector::gateways::{OrderService, ORDER_QUERY_URL};
use wxpay_connector::notifications::{self, NotificationConsumer, NotifyHandler, WebhookState};
use wxpay_connector::{ParamSet, Result};

#[derive(Default)]
struct CountingConsumer {
    calls: AtomicUsize,
}

#[async_trait]
impl NotificationConsumer for CountingConsumer {
    type Output = ();

    async fn on_verified(&self, _notification: &ParamSet, _config: &MerchantConfig) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn state(
    transport: Arc<RecordingTransport>,
    consumer: Arc<CountingConsumer>,
) -> web::Data<WebhookState<CountingConsumer>> {
    web::Data::new(WebhookState::new(
        NotifyHandler::new(OrderService::new(transport)),
        merchant_config(),
        consumer,
    ))
}

#[actix_web::test]
async fn test_verified_notification_gets_success_reply() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond(ORDER_QUERY_URL, order_query_response("SUCCESS", "SUCCESS"));
    let consumer = Arc::new(CountingConsumer::default());
    let state = state(transport, consumer.clone());

    let app = test::init_service(
        App::new().configure(|cfg| notifications::configure(cfg, state)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/notify")
        .insert_header((CONTENT_TYPE, "text/xml"))
        .set_payload(signed_xml(notification_params(), API_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap(),
        "text/xml"
    );

    let body = test::read_body(resp).await;
    let reply = wire::from_xml(&body).unwrap();
    assert_eq!(reply.value("return_code").as_deref(), Some("SUCCESS"));
    assert_eq!(reply.value("return_msg").as_deref(), Some("OK"));
    assert_eq!(consumer.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_rejected_notification_still_returns_200() {
    let transport = Arc::new(RecordingTransport::new());
    let consumer = Arc::new(CountingConsumer::default());
    let state = state(transport.clone(), consumer.clone());

    let app = test::init_service(
        App::new().configure(|cfg| notifications::configure(cfg, state)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/notify")
        .set_payload(signed_xml(notification_params(), "attacker-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    let reply = wire::from_xml(&body).unwrap();
    assert_eq!(reply.value("return_code").as_deref(), Some("FAIL"));
    assert!(reply.value("return_msg").as_deref().is_some_and(|m| !m.is_empty()));
    assert_eq!(consumer.calls.load(Ordering::SeqCst), 0);
    assert!(transport.calls().is_empty());
}

#[actix_web::test]
async fn test_garbage_body_gets_fail_reply() {
    let transport = Arc::new(RecordingTransport::new());
    let consumer = Arc::new(CountingConsumer::default());
    let state = state(transport, consumer);

    let app = test::init_service(
        App::new().configure(|cfg| notifications::configure(cfg, state)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/notify")
        .set_payload("not xml at all")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("<return_code><![CDATA[FAIL]]></return_code>"));
}

#[actix_web::test]
async fn test_get_is_not_routed() {
    let state = state(
        Arc::new(RecordingTransport::new()),
        Arc::new(CountingConsumer::default()),
    );

    let app = test::init_service(
        App::new().configure(|cfg| notifications::configure(cfg, state)),
    )
    .await;

    let req = test::TestRequest::get().uri("/notify").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 405);
}

#[actix_web::test]
async fn test_trailing_slash_is_accepted() {
    let state = state(
        Arc::new(RecordingTransport::new()),
        Arc::new(CountingConsumer::default()),
    );

    let app = test::init_service(
        App::new().configure(|cfg| notifications::configure(cfg, state)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/notify/")
        .set_payload("<xml></xml>")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
}
