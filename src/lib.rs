pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::WarmupToml;

pub use crate::adapters::http::HttpEmailProvider;
pub use crate::adapters::memory::{DryRunProvider, MemoryPlatform};
pub use crate::core::engine::WarmupEngine;
pub use crate::core::schedule::WarmupSchedule;
pub use crate::utils::error::{Result, WarmupError};
