#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::cli::CliConfig;
pub use self::toml_config::WarmupToml;
