use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid argument `{field}` = {value}: {reason}")]
    InvalidArgument {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Holiday request queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Holiday gateway failed for year {year}: {message}")]
    GatewayError { year: i32, message: String },

    #[error("Holiday request sequencer is no longer running")]
    SequencerClosed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in `{field}`: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for `{field}` ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration `{field}`")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Capacity,
    External,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CrawlError {
    pub fn invalid_argument(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        CrawlError::InvalidArgument {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CrawlError::InvalidArgument { .. } => ErrorCategory::Input,
            CrawlError::QueueFull { .. } => ErrorCategory::Capacity,
            CrawlError::GatewayError { .. } => ErrorCategory::External,
            CrawlError::ConfigError { .. }
            | CrawlError::ConfigValidationError { .. }
            | CrawlError::InvalidConfigValueError { .. }
            | CrawlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CrawlError::SequencerClosed
            | CrawlError::IoError(_)
            | CrawlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Capacity | ErrorCategory::External => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 是否值得稍後重試
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CrawlError::QueueFull { .. } | CrawlError::GatewayError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CrawlError::InvalidArgument { .. } => {
                "檢查 month_offset 是否為非負整數，dep_day / return_day 是否介於 1-31"
            }
            CrawlError::QueueFull { .. } => "系統繁忙，請稍後再試",
            CrawlError::GatewayError { .. } => "確認節假日資料來源可連線後重試",
            CrawlError::SequencerClosed => "重新啟動服務",
            CrawlError::IoError(_) => "確認檔案路徑存在且具有讀取權限",
            CrawlError::SerializationError(_) => "回報此問題，輸出資料無法序列化",
            CrawlError::ConfigError { .. }
            | CrawlError::ConfigValidationError { .. }
            | CrawlError::InvalidConfigValueError { .. }
            | CrawlError::MissingConfigError { .. } => "修正 TOML 配置檔後重新執行",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CrawlError::InvalidArgument { field, reason, .. } => {
                format!("參數 {} 無效：{}", field, reason)
            }
            CrawlError::QueueFull { .. } => "系統繁忙，請稍後再試".to_string(),
            CrawlError::GatewayError { year, message } => {
                format!("無法獲取 {} 年節假日資料：{}", year, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
