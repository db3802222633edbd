use crate::adapters::taiwan_calendar::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECONDS};
use crate::core::policy::WindowPolicy;
use crate::core::sequencer::DEFAULT_QUEUE_CAPACITY;
use crate::utils::error::{CrawlError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub sequencer: SequencerConfig,
    pub calendar: CalendarConfig,
    pub fixed_windows: Vec<FixedWindowConfig>,
    pub policy: WindowPolicy,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// `{year}` 會被替換成查詢年份
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// 計算「今天」所用的時區
    pub utc_offset_hours: i32,
}

/// 固定月份爬取區間，節日區間不得與之重疊
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedWindowConfig {
    pub month_offset: i64,
    pub dep_day: i64,
    pub return_day: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub verbose: Option<bool>,
    pub json_logs: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            sequencer: SequencerConfig::default(),
            calendar: CalendarConfig::default(),
            fixed_windows: vec![
                FixedWindowConfig {
                    month_offset: 2,
                    dep_day: 5,
                    return_day: 10,
                },
                FixedWindowConfig {
                    month_offset: 6,
                    dep_day: 24,
                    return_day: 28,
                },
            ],
            policy: WindowPolicy::default(),
            monitoring: None,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { utc_offset_hours: 8 }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CrawlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CrawlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOLIDAY_ENDPOINT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CrawlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.gateway.endpoint.trim().is_empty() {
            return Err(CrawlError::MissingConfigError {
                field: "gateway.endpoint".to_string(),
            });
        }
        validate_url("gateway.endpoint", &self.gateway.endpoint)?;
        if !self.gateway.endpoint.contains("{year}") {
            return Err(CrawlError::InvalidConfigValueError {
                field: "gateway.endpoint".to_string(),
                value: self.gateway.endpoint.clone(),
                reason: "Endpoint must contain a {year} placeholder".to_string(),
            });
        }
        validate_positive_number(
            "gateway.timeout_seconds",
            self.gateway.timeout_seconds as usize,
            1,
        )?;

        validate_positive_number("sequencer.queue_capacity", self.sequencer.queue_capacity, 1)?;
        validate_range("calendar.utc_offset_hours", self.calendar.utc_offset_hours, -12, 14)?;

        for (idx, window) in self.fixed_windows.iter().enumerate() {
            validate_range(
                &format!("fixed_windows[{}].month_offset", idx),
                window.month_offset,
                0,
                i64::from(u16::MAX),
            )?;
            validate_range(&format!("fixed_windows[{}].dep_day", idx), window.dep_day, 1, 31)?;
            validate_range(
                &format!("fixed_windows[{}].return_day", idx),
                window.return_day,
                1,
                31,
            )?;
            if window.dep_day > window.return_day {
                return Err(CrawlError::InvalidConfigValueError {
                    field: format!("fixed_windows[{}]", idx),
                    value: format!("{}..{}", window.dep_day, window.return_day),
                    reason: "dep_day must not be after return_day".to_string(),
                });
            }
        }

        self.policy.validate()
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.gateway.timeout_seconds)
    }

    pub fn fixed_windows_for(&self, month_offset: i64) -> impl Iterator<Item = &FixedWindowConfig> {
        self.fixed_windows
            .iter()
            .filter(move |w| w.month_offset == month_offset)
    }

    pub fn verbose_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
