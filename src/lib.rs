// Library surface for the binary, headless/integration tests and reuse.
// Terminal rendering stays in main.rs and ui.rs.
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod feedback;
pub mod game;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod util;
