//! Aurora Storefront - service entry point

use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aurora_store::api;
use aurora_store::checkout::Coordinator;
use aurora_store::config::Config;
use aurora_store::notify::email::ResendMailer;
use aurora_store::notify::Notifier;
use aurora_store::store::pg::{PgCartStore, PgOrderStore, PgRecipientSource};
use aurora_store::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);
    let db = PgPoolOptions::new().max_connections(10).connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("NATS unavailable, events disabled: {e}");
                None
            }
        },
        None => None,
    };

    let notifier = Arc::new(Notifier::new(
        Arc::new(ResendMailer::new(config.mail.clone())),
        Arc::new(PgRecipientSource::new(db.clone())),
        config.mail.admin_email.clone(),
    ));
    let checkout = Arc::new(Coordinator::new(
        Arc::new(PgOrderStore::new(db.clone())),
        Arc::new(PgCartStore::new(db.clone())),
        notifier.clone(),
        config.payment_page_url.clone(),
        config.notify_timeout,
    ));

    let state = AppState { db, nats, config: config.clone(), notifier, checkout };
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🚀 aurora-store listening on {addr}");
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
