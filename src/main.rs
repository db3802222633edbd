use clap::Parser;
use crawl_dates::config::Command;
use crawl_dates::utils::error::{CrawlError, ErrorSeverity};
use crawl_dates::utils::logger;
use crawl_dates::{CliConfig, CrawlDateService};
use serde::Serialize;

#[derive(Serialize)]
struct SuccessResponse<T: Serialize> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 配置讀取失敗時也要有日誌可看，先用命令列參數初始化
    let config = match cli.load_app_config() {
        Ok(config) => {
            init_logger(cli.verbose_logging(&config), cli.json_logging(&config));
            config
        }
        Err(e) => {
            init_logger(cli.verbose, cli.json_log);
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            exit_with(&e);
        }
    };

    tracing::info!("Starting crawl-dates CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let service = CrawlDateService::from_config(&config).unwrap_or_else(|e| exit_with(&e));

    match cli.command {
        Command::Fixed {
            month_offset,
            dep_day,
            return_day,
        } => match service.fixed_dates(month_offset, dep_day, return_day) {
            Ok(dates) => print_success(&dates)?,
            Err(e) => exit_with(&e),
        },
        Command::Holidays { month_offsets } => {
            // 同時送出，由佇列依序處理
            let mut pending = Vec::new();
            for month_offset in month_offsets {
                let service = service.clone();
                pending.push(tokio::spawn(async move {
                    service.holiday_dates(month_offset).await
                }));
            }

            let mut results = Vec::new();
            for task in pending {
                match task.await? {
                    Ok(dates) => results.push(dates),
                    Err(e) => exit_with(&e),
                }
            }

            if results.len() == 1 {
                print_success(&results[0])?;
            } else {
                print_success(&results)?;
            }
        }
    }

    tracing::info!("✅ crawl-dates completed successfully");
    Ok(())
}

fn init_logger(verbose: bool, json: bool) {
    if json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
}

fn print_success<T: Serialize>(data: &T) -> Result<(), CrawlError> {
    let body = serde_json::to_string_pretty(&SuccessResponse {
        success: true,
        data,
    })?;
    println!("{}", body);
    Ok(())
}

fn exit_with(e: &CrawlError) -> ! {
    tracing::error!(
        "❌ crawl-dates failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    let body = serde_json::to_string_pretty(&ErrorResponse {
        error: e.user_friendly_message(),
    })
    .unwrap_or_else(|_| e.to_string());
    println!("{}", body);
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    if e.is_retryable() {
        tracing::warn!("🔁 This failure is transient, the same command can be retried later");
    }

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
