use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "crawl-dates")]
#[command(about = "Compute departure / return dates for the flight-search crawler")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the holiday registry endpoint (must contain {year})
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fixed departure / return days in the target month
    Fixed {
        #[arg(long, allow_negative_numbers = true)]
        month_offset: i64,
        #[arg(long, allow_negative_numbers = true)]
        dep_day: i64,
        #[arg(long, allow_negative_numbers = true)]
        return_day: i64,
    },
    /// Travel windows around public holidays in the target month(s)
    Holidays {
        #[arg(long = "month-offset", required = true, num_args = 1.., allow_negative_numbers = true)]
        month_offsets: Vec<i64>,
    },
}

impl CliConfig {
    /// 載入 TOML（若有指定），套用命令列覆蓋後驗證
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                AppConfig::from_file(path)?
            }
            None => AppConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            tracing::info!("🔧 Holiday endpoint overridden to: {}", endpoint);
            config.gateway.endpoint = endpoint.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn verbose_logging(&self, config: &AppConfig) -> bool {
        self.verbose || config.verbose_logging()
    }

    pub fn json_logging(&self, config: &AppConfig) -> bool {
        self.json_log || config.json_logging()
    }
}
