use billet_api::{app, config::Config, state::AppState};
use billet_core::settings::{MemorySettingsStore, SettingsStore};
use billet_order::{CancellationService, MemoryOrderService};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billet_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Billet API on port {}", config.server.port);

    let orders = Arc::new(MemoryOrderService::new());
    let settings: Arc<dyn SettingsStore> = Arc::new(MemorySettingsStore::new());
    let cancellation = Arc::new(CancellationService::new(
        orders.clone(),
        orders.clone(),
        settings.clone(),
    ));

    let app_state = AppState {
        orders,
        settings,
        cancellation,
        shop_base_url: config.presale.base_url.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
