// Library surface shared by the binary and the integration tests.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod language;
pub mod progress;
pub mod server;
pub mod stats;
pub mod util;
pub mod word_generator;

pub use config::{Config, ConfigStore, FileConfigStore};
pub use error::{Result, TypetestError};
pub use language::{Difficulty, Language};
pub use server::{create_router, AppState};
pub use stats::StatsDb;
