use hookbin::application::context::AppContext;
use hookbin::config;
use hookbin::domain::services::admission::AdmissionPolicy;
use hookbin::infrastructure::db::repositories::Repositories;
use hookbin::infrastructure::db::sqlite::WebhookDatabaseManager;
use hookbin::infrastructure::events::WebhookEventBus;
use hookbin::interface::http;
use hookbin::interface::http::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Step 1: Load configuration and initialize logging.
    let settings = config::load().expect("load config");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Step 2: Open the per-webhook storage manager.
    let manager = Arc::new(
        WebhookDatabaseManager::new(
            settings.storage.base_path.clone(),
            settings.storage.max_databases,
        )
        .expect("open storage directory"),
    );

    // Step 3: Build repositories, admission policy, and the event bus.
    let repos = Repositories::sqlite(manager);
    let admission = AdmissionPolicy::new(
        settings.webhooks.max_requests,
        settings.webhooks.rate_limit,
        Duration::from_millis(settings.webhooks.rate_window_ms),
    );
    let event_bus = WebhookEventBus::default();

    // Step 4: Assemble shared application context and HTTP state.
    let ctx = AppContext::new(repos, admission, event_bus);
    let state = AppState {
        ctx: Arc::new(ctx),
        settings: settings.clone(),
    };

    // Step 5: Build the HTTP app.
    let app = http::app(state);
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Step 6: Bind and serve (with connect info so captures record client ips).
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("bind server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("serve");
}
