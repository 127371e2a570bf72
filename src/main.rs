use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use agencysite::config::AppConfig;
use agencysite::db;
use agencysite::handlers;
use agencysite::services::booking::SqliteBookingService;
use agencysite::services::email::emailjs::EmailJsNotifier;
use agencysite::services::email::EmailNotifier;
use agencysite::services::estimate_store::SqliteEstimateService;
use agencysite::services::faq::{BusinessProfile, FaqBook};
use agencysite::services::sessions::SessionRegistry;
use agencysite::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let db = db::open_shared(&config.database_url)?;

    let notifier: Option<Arc<dyn EmailNotifier>> = match EmailJsNotifier::from_config(&config) {
        Ok(Some(n)) => {
            tracing::info!("email notifications enabled (EmailJS)");
            Some(Arc::new(n))
        }
        Ok(None) => {
            tracing::warn!("EmailJS not configured, notifications disabled and contact form falls back to mailto");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "EmailJS disabled, contact form falls back to mailto");
            None
        }
    };

    let state = Arc::new(AppState {
        db: Arc::clone(&db),
        config: config.clone(),
        faq: FaqBook::new(BusinessProfile::from_config(&config)),
        bookings: Box::new(SqliteBookingService::new(
            Arc::clone(&db),
            notifier.clone(),
            config.business_name.clone(),
        )),
        estimates: Box::new(SqliteEstimateService::new(Arc::clone(&db))),
        notifier,
        sessions: SessionRegistry::default(),
    });

    let pruning = Arc::clone(&state);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(5 * 60));
        loop {
            ticker.tick().await;
            pruning.sessions.prune_expired();
        }
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
