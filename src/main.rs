#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use fanreach_warmup::app::use_cases::{SkipReason, TickResult};
#[cfg(feature = "cli")]
use fanreach_warmup::domain::model::Campaign;
#[cfg(feature = "cli")]
use fanreach_warmup::domain::ports::EmailProvider;
#[cfg(feature = "cli")]
use fanreach_warmup::utils::{logger, validation::Validate};
#[cfg(feature = "cli")]
use fanreach_warmup::{
    CliConfig, DryRunProvider, HttpEmailProvider, MemoryPlatform, WarmupEngine, WarmupToml,
};
#[cfg(feature = "cli")]
use std::sync::Arc;
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
const DEMO_USER: &str = "demo-artist";
#[cfg(feature = "cli")]
const DEMO_CAMPAIGN: &str = "camp-0001";

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();
    config.resolve_api_key();

    // --config 指定的 TOML 覆蓋 provider/sender 設定
    if let Some(path) = config.config.clone() {
        match WarmupToml::from_file(&path) {
            Ok(file_config) => {
                config.provider_endpoint = file_config.provider.endpoint.clone();
                config.api_key = file_config.provider.api_key.clone();
                config.from_email = file_config.sender.from_email.clone();
                config.from_name = file_config.sender.from_name.clone();
                config.send_timeout_seconds = file_config.timeout_seconds();
                if file_config.monitoring_enabled() {
                    config.monitor = true;
                }
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting fanreach-warmup demo runner");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 記憶體平台 + demo 名單與草稿 campaign
    let platform = MemoryPlatform::new();
    platform.seed_contacts(DEMO_USER, config.demo_contacts);
    platform.insert_campaign(&Campaign::draft(
        DEMO_CAMPAIGN,
        DEMO_USER,
        "New single out now",
        "<h1>Out now</h1><p>Stream the new single everywhere.</p>",
    ));

    let provider: Arc<dyn EmailProvider> = if config.dry_run {
        tracing::info!("📭 Dry-run mode, sends are accepted locally");
        Arc::new(DryRunProvider::new())
    } else {
        match HttpEmailProvider::new(
            config.provider_endpoint.clone(),
            config.api_key.clone(),
            config.from_email.clone(),
            config.from_name.clone(),
            Duration::from_secs(config.send_timeout_seconds),
        ) {
            Ok(provider) => Arc::new(provider),
            Err(e) => {
                eprintln!("❌ Failed to build HTTP provider: {}", e);
                std::process::exit(1);
            }
        }
    };

    let engine = WarmupEngine::new_with_monitoring(
        platform.clone(),
        platform.clone(),
        provider,
        platform.clone(),
        platform.clone(),
        config.monitor,
    );

    match run_demo(&engine, config.ticks).await {
        Ok(()) => {
            engine.log_final_stats();
            tracing::info!("✅ Warm-up demo completed");
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Warm-up demo failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                fanreach_warmup::utils::error::ErrorSeverity::Low => 0,
                fanreach_warmup::utils::error::ErrorSeverity::Medium => 2,
                fanreach_warmup::utils::error::ErrorSeverity::High => 1,
                fanreach_warmup::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
async fn run_demo(engine: &WarmupEngine, ticks: u32) -> fanreach_warmup::Result<()> {
    // 啟動暖機並顯示排程預覽
    let preview = engine.start(DEMO_USER, DEMO_CAMPAIGN).await?;
    tracing::info!(
        "🚀 Warm-up started: {} contacts over {} days",
        preview.total_contacts,
        preview.estimated_days
    );
    println!("{}", serde_json::to_string_pretty(&preview)?);

    // 模擬外部排程器：一個 tick 一批
    for tick_no in 1..=ticks {
        match engine.tick(DEMO_USER, DEMO_CAMPAIGN).await? {
            TickResult::Ran(report) => {
                tracing::info!(
                    "📨 Tick {}: day {}, sent {}, failed {}",
                    tick_no,
                    report.day,
                    report.batch_sent,
                    report.batch_failed
                );

                if report.completed {
                    tracing::info!("🏁 Schedule exhausted after tick {}", tick_no);
                    break;
                }
            }
            TickResult::Skipped { reason } => {
                tracing::warn!("⏭️ Tick {} skipped: {}", tick_no, reason.message());
                if matches!(reason, SkipReason::WarmupPaused { .. }) {
                    break;
                }
            }
        }

        // 每個 tick 之後跑一次健康檢查，critical 時自動暫停
        let health = engine.check_health(DEMO_USER, DEMO_CAMPAIGN).await?;
        if health.pause_applied {
            tracing::warn!(
                "🛑 Auto-pause applied: {}",
                health
                    .assessment
                    .pause_reason
                    .as_deref()
                    .unwrap_or("threshold breached")
            );
            break;
        }
    }

    // 最終狀態給 UI 的複合物件
    let status = engine.status(DEMO_USER, DEMO_CAMPAIGN).await?;
    println!("{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("fanreach-warmup binary requires the 'cli' feature");
}
