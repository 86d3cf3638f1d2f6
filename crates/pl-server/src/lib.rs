//! Pawlog API server — library crate.
//!
//! Re-exports all modules so the binary (`main.rs`) and the e2e test
//! crate can access internal types like `AppState`, `build_router`, and
//! `TelegramNotifier`.

pub mod config;
pub mod db;
pub mod error;
pub mod notifier;
pub mod routes;
pub mod state;
