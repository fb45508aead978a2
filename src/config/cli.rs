use crate::utils::error::{Result, WarmupError};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_positive_number, validate_range,
    validate_url, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "fanreach-warmup")]
#[command(about = "Email warm-up engine demo runner for the FanReach artist platform")]
pub struct CliConfig {
    #[arg(long, default_value = "https://api.brevo.com/v3/smtp/email")]
    pub provider_endpoint: String,

    /// 留空時從 BREVO_API_KEY 環境變數補
    #[arg(long, default_value = "")]
    pub api_key: String,

    #[arg(long, default_value = "artist@fanreach.app")]
    pub from_email: String,

    #[arg(long, default_value = "FanReach Artist")]
    pub from_name: String,

    #[arg(long, default_value = "30")]
    pub send_timeout_seconds: u64,

    /// demo 名單的聯絡人數
    #[arg(long, default_value = "70")]
    pub demo_contacts: u64,

    /// 要模擬的排程 tick 次數
    #[arg(long, default_value = "7")]
    pub ticks: u32,

    #[arg(long, help = "Accept every send locally instead of calling the provider")]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log system stats around ticks")]
    pub monitor: bool,

    #[arg(long, help = "Load provider/sender settings from a TOML file")]
    pub config: Option<String>,
}

impl CliConfig {
    /// CLI 參數沒給 api key 時退回環境變數
    pub fn resolve_api_key(&mut self) {
        if self.api_key.is_empty() {
            if let Ok(key) = std::env::var("BREVO_API_KEY") {
                self.api_key = key;
            }
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("provider_endpoint", &self.provider_endpoint)?;
        validate_email("from_email", &self.from_email)?;
        validate_non_empty_string("from_name", &self.from_name)?;
        validate_positive_number("demo_contacts", self.demo_contacts as usize, 1)?;
        validate_range("ticks", self.ticks, 1, 31)?;
        validate_range("send_timeout_seconds", self.send_timeout_seconds, 1, 300)?;

        if !self.dry_run && self.api_key.trim().is_empty() {
            return Err(WarmupError::MissingConfigError {
                field: "api_key (or BREVO_API_KEY, or use --dry-run)".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig::parse_from(["fanreach-warmup", "--dry-run"])
    }

    #[test]
    fn test_defaults_are_valid_in_dry_run() {
        let config = base_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.demo_contacts, 70);
        assert_eq!(config.ticks, 7);
    }

    #[test]
    fn test_live_mode_requires_api_key() {
        let config = CliConfig::parse_from(["fanreach-warmup"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api_key"));

        let config = CliConfig::parse_from(["fanreach-warmup", "--api-key", "xkeysib-123"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_endpoint_and_sender_rejected() {
        let config = CliConfig::parse_from([
            "fanreach-warmup",
            "--dry-run",
            "--provider-endpoint",
            "not-a-url",
        ]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from([
            "fanreach-warmup",
            "--dry-run",
            "--from-email",
            "not-an-email",
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_range_is_bounded() {
        let config = CliConfig::parse_from(["fanreach-warmup", "--dry-run", "--ticks", "0"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["fanreach-warmup", "--dry-run", "--ticks", "32"]);
        assert!(config.validate().is_err());
    }
}
