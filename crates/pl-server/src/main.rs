//! Pawlog API server — pet-care records REST API with an AI command
//! pipeline and a Telegram webhook.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use pl_intent::{CommandInterpreter, GeminiConfig, MemoryStore, RecordStore};
use pl_server::config::ServerConfig;
use pl_server::db::{self, PgStore};
use pl_server::notifier::TelegramNotifier;
use pl_server::routes;
use pl_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pl-server starting");

    let config = ServerConfig::from_env();

    let store: Arc<dyn RecordStore> = if let Some(database_url) = &config.database_url {
        tracing::info!("connecting to PostgreSQL");
        let pool = db::connect(database_url).await?;
        Arc::new(PgStore::new(pool))
    } else {
        tracing::warn!("DATABASE_URL not set — using in-memory store");
        Arc::new(MemoryStore::new())
    };

    let interpreter = Arc::new(CommandInterpreter::from_config(GeminiConfig::from_env()));

    let notifier = config
        .telegram_bot_token
        .clone()
        .map(|token| Arc::new(TelegramNotifier::new(token)));
    if notifier.is_none() {
        tracing::warn!("TELEGRAM_BOT_TOKEN not set — webhook replies disabled");
    }

    let state = AppState::new(
        store,
        interpreter,
        notifier,
        config.telegram_bot_token.clone(),
        config.default_pet_id.clone(),
    );

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
