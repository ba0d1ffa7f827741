//! Voltio Storefront - HTTP server

use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voltio_storefront::domain::value_objects::Email;
use voltio_storefront::storage::{FileStore, OfflineRemote, PgRemote, RemoteStore};
use voltio_storefront::{router, AppState, DataStore, LocalMirror, PricingPolicy, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let settings = Settings::from_env()?;
    tracing::debug!(?settings, "settings loaded");

    let remote: Arc<dyn RemoteStore> = match settings.database_url.as_deref() {
        Some(url) => {
            let db = PgPoolOptions::new().max_connections(10).connect(url).await?;
            sqlx::migrate!("./migrations").run(&db).await?;
            Arc::new(PgRemote::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, running on the local mirror only");
            Arc::new(OfflineRemote)
        }
    };
    if let Some(dir) = settings.local_store_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let local = LocalMirror::new(Arc::new(FileStore::new(settings.local_store_path.clone())));
    let store = DataStore::new(remote, local);

    let policy = PricingPolicy::default().with_shipping(settings.shipping_cost);
    let state = AppState::new(store, policy, settings.promo_length());
    if let Some(seed) = &settings.admin {
        let email = Email::parse(&seed.email).map_err(|e| anyhow::anyhow!("ADMIN_EMAIL: {e}"))?;
        state.accounts.ensure_admin("Admin", &email, &seed.password).await?;
    }
    let app = router(state);

    let addr = settings.socket_addr();
    tracing::info!(%addr, "Voltio storefront listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
