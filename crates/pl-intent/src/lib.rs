//! Pawlog command pipeline.
//!
//! Turns free-text pet-care commands ("Арчи весит 12.5 кг") into persisted
//! records in three steps, each usable on its own:
//!
//! - [`CommandInterpreter`] — text → [`pl_protocol::ParsedCommand`] via an
//!   LLM parse with a guaranteed fallback-to-note path. Never fails.
//! - [`IntentRouter`] — parsed command + context → one insert against a
//!   [`RecordStore`], with per-intent defaults for missing fields.
//! - [`reporter`] — routing outcome → short acknowledgment string.

pub mod client;
pub mod interpreter;
pub mod mock;
pub mod reporter;
pub mod router;
pub mod store;

pub use client::{GeminiClient, GeminiConfig, LlmError};
pub use interpreter::CommandInterpreter;
pub use mock::MemoryStore;
pub use router::IntentRouter;
pub use store::{RecordStore, StoreError};
