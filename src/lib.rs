// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds the terminal shell on top of this.
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod error;
pub mod input_buffer;
pub mod keymap;
pub mod logging;
pub mod round;
pub mod runtime;
pub mod session;
pub mod ui;

/// Clock resolution for timed rounds
pub const TICK_RATE_MS: u64 = 100;

pub use catalog::Catalog;
pub use session::{KeyAction, Mode, SessionEvent, SessionState, Trainer, Transition};
