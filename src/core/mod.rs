pub mod commands;
pub mod config;
pub mod engine;
pub mod state;

pub use engine::{EngineOptions, Mode, ShellEngine};
pub use state::WorkingDirectory;
