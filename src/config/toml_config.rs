use crate::utils::error::{Result, WarmupError};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarmupToml {
    pub platform: PlatformConfig,
    pub provider: ProviderConfig,
    pub sender: SenderConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub name: String,
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderConfig {
    pub from_email: String,
    pub from_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl WarmupToml {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WarmupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 先做環境變數替換，API key 不用寫死在檔案裡
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| WarmupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BREVO_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("static env var pattern");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.provider.timeout_seconds.unwrap_or(30)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for WarmupToml {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("platform.name", &self.platform.name)?;
        validate_url("provider.endpoint", &self.provider.endpoint)?;
        validate_non_empty_string("provider.api_key", &self.provider.api_key)?;
        validate_range("provider.timeout_seconds", self.timeout_seconds(), 1, 300)?;
        validate_email("sender.from_email", &self.sender.from_email)?;
        validate_non_empty_string("sender.from_name", &self.sender.from_name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[platform]
name = "fanreach"
environment = "staging"

[provider]
endpoint = "https://api.brevo.com/v3/smtp/email"
api_key = "xkeysib-test"
timeout_seconds = 10

[sender]
from_email = "artist@label.com"
from_name = "DJ Nova"
"#;

        let config = WarmupToml::from_toml_str(toml_content).unwrap();

        assert_eq!(config.platform.name, "fanreach");
        assert_eq!(config.provider.endpoint, "https://api.brevo.com/v3/smtp/email");
        assert_eq!(config.timeout_seconds(), 10);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_WARMUP_API_KEY", "xkeysib-from-env");

        let toml_content = r#"
[platform]
name = "fanreach"

[provider]
endpoint = "https://api.brevo.com/v3/smtp/email"
api_key = "${TEST_WARMUP_API_KEY}"

[sender]
from_email = "artist@label.com"
from_name = "DJ Nova"
"#;

        let config = WarmupToml::from_toml_str(toml_content).unwrap();
        assert_eq!(config.provider.api_key, "xkeysib-from-env");

        std::env::remove_var("TEST_WARMUP_API_KEY");
    }

    #[test]
    fn test_unset_env_var_is_left_verbatim_and_fails_validation_upstream() {
        let toml_content = r#"
[platform]
name = "fanreach"

[provider]
endpoint = "https://api.brevo.com/v3/smtp/email"
api_key = "${DEFINITELY_NOT_SET_WARMUP_KEY}"

[sender]
from_email = "artist@label.com"
from_name = "DJ Nova"
"#;

        let config = WarmupToml::from_toml_str(toml_content).unwrap();
        // 保留原樣，讓使用者在錯誤訊息裡看得到是哪個變數沒設定
        assert_eq!(config.provider.api_key, "${DEFINITELY_NOT_SET_WARMUP_KEY}");
    }

    #[test]
    fn test_config_validation_rejects_bad_endpoint() {
        let toml_content = r#"
[platform]
name = "fanreach"

[provider]
endpoint = "not-a-url"
api_key = "xkeysib-test"

[sender]
from_email = "artist@label.com"
from_name = "DJ Nova"
"#;

        let config = WarmupToml::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let toml_content = r#"
[platform]
name = "fanreach"
"#;

        let err = WarmupToml::from_toml_str(toml_content).unwrap_err();
        assert!(matches!(err, WarmupError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[platform]
name = "fanreach"

[provider]
endpoint = "https://api.brevo.com/v3/smtp/email"
api_key = "xkeysib-test"

[sender]
from_email = "artist@label.com"
from_name = "DJ Nova"

[monitoring]
enabled = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = WarmupToml::from_file(temp_file.path()).unwrap();
        assert_eq!(config.platform.name, "fanreach");
        assert!(config.monitoring_enabled());
    }
}
