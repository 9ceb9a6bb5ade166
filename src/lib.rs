// Library surface for headless/integration tests and reuse.
// Terminal setup and argument parsing stay in main.rs.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod difficulty;
pub mod drag;
pub mod history;
pub mod logging;
pub mod quest;
pub mod question;
pub mod random;
pub mod runtime;
pub mod session;
pub mod sound;
pub mod tiers;
pub mod ui;
pub mod util;
