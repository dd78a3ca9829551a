// Library surface for headless/integration tests and reuse.
// The TUI front-end lives in main.rs/ui.rs and is bin-only.
pub mod app_dirs;
pub mod clock;
pub mod combo;
pub mod config;
pub mod ledger;
pub mod runtime;
pub mod score;
pub mod session;
pub mod target;
pub mod tier;
