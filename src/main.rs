use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wxpay_connector::config::{Config, MerchantConfig};
use wxpay_connector::gateways::OrderService;
use wxpay_connector::notifications::{self, NotificationConsumer, NotifyHandler, WebhookState};
use wxpay_connector::{ParamSet, Result};

/// Consumer used by the standalone receiver: records verified payments
struct LoggingConsumer;

#[async_trait]
impl NotificationConsumer for LoggingConsumer {
    type Output = ();

    async fn on_verified(&self, notification: &ParamSet, _config: &MerchantConfig) -> Result<()> {
        tracing::info!(
            transaction_id = %notification.value("transaction_id").unwrap_or_default(),
            out_trade_no = %notification.value("out_trade_no").unwrap_or_default(),
            total_fee = %notification.value("total_fee").unwrap_or_default(),
            "Payment confirmed"
        );
        Ok(())
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wxpay_connector=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting WeChat Pay notification receiver");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());
    tracing::info!(
        mch_id = %config.merchant.mch_id,
        report_level = ?config.merchant.report_level,
        sign_type = %config.merchant.sign_type,
        proxy = config.merchant.proxy.is_enabled(),
        "Merchant configuration loaded"
    );

    let handler = NotifyHandler::new(OrderService::http());
    let state = web::Data::new(WebhookState::new(
        handler,
        config.merchant.clone(),
        Arc::new(LoggingConsumer),
    ));

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(health_check))
            .configure(|cfg| notifications::configure(cfg, state))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

/// Health check response structure
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: String,
}

/// GET /health - Liveness probe
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
