use thiserror::Error;

#[derive(Error, Debug)]
pub enum WarmupError {
    #[error("Email provider request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{entity} not found: {id}")]
    NotFoundError { entity: &'static str, id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Warm-up state conflict: {message}")]
    StateConflictError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類，用於日誌與監控聚合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Validation,
    State,
    Config,
    Internal,
}

/// 錯誤嚴重程度，決定 CLI 退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WarmupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) => ErrorCategory::Network,
            Self::StorageError { .. } => ErrorCategory::Storage,
            Self::ValidationError { .. } | Self::NotFoundError { .. } => ErrorCategory::Validation,
            Self::StateConflictError { .. } => ErrorCategory::State,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 瞬態網路錯誤，下一個 tick 重試即可
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::ValidationError { .. }
            | Self::StateConflictError { .. }
            | Self::NotFoundError { .. } => ErrorSeverity::Medium,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::High,
            Self::StorageError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check the provider endpoint and API key; the next scheduled tick retries safely"
            }
            ErrorCategory::Storage => {
                "Check the campaign store / execution log backend; the tick is safe to re-run"
            }
            ErrorCategory::Validation => {
                "Fix the campaign content or contact list, then retry; nothing was changed"
            }
            ErrorCategory::State => {
                "Inspect the warm-up status first; a paused campaign needs an explicit resume"
            }
            ErrorCategory::Config => "Fix the configuration value and run again",
            ErrorCategory::Internal => "Re-run with --verbose and report the full log",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => format!("Cannot start warm-up: {}", message),
            Self::StateConflictError { message } => format!("Warm-up state conflict: {}", message),
            Self::NotFoundError { entity, id } => format!("{} '{}' was not found", entity, id),
            other => other.to_string(),
        }
    }

    // 常用建構捷徑，讓呼叫端不用每次手寫 struct variant
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn state_conflict(message: impl Into<String>) -> Self {
        Self::StateConflictError {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFoundError {
            entity,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WarmupError>;
