//! Shared application state for the Axum server.
//!
//! Every dependency is constructed once at process start and injected by
//! reference — no lazily-memoized module globals. Two store modes:
//! PostgreSQL (production) and in-memory (tests and DB-less development).

use std::sync::Arc;

use pl_intent::{CommandInterpreter, IntentRouter, MemoryStore, RecordStore};

use crate::notifier::TelegramNotifier;

/// Shared application state, cloned into Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence collaborator (PostgreSQL or in-memory).
    pub store: Arc<dyn RecordStore>,
    /// Free-text classifier (AI path plus guaranteed fallback).
    pub interpreter: Arc<CommandInterpreter>,
    /// Routes parsed commands onto the store.
    pub router: Arc<IntentRouter>,
    /// Outbound Telegram replies. None disables delivery.
    pub notifier: Option<Arc<TelegramNotifier>>,
    /// Expected `?token=` on webhook calls. None rejects all updates.
    pub webhook_token: Option<String>,
    /// Pet that chat commands are recorded against.
    pub default_pet_id: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        interpreter: Arc<CommandInterpreter>,
        notifier: Option<Arc<TelegramNotifier>>,
        webhook_token: Option<String>,
        default_pet_id: impl Into<String>,
    ) -> Self {
        let router = Arc::new(IntentRouter::new(store.clone()));
        Self {
            store,
            interpreter,
            router,
            notifier,
            webhook_token,
            default_pet_id: default_pet_id.into(),
        }
    }

    /// In-memory state with the AI path disabled (tests, dev without
    /// credentials).
    pub fn with_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(CommandInterpreter::disabled()),
            None,
            None,
            "demo-pet",
        )
    }
}
