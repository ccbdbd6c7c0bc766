use clap::Parser;
use practice_tasks::config::Command;
use practice_tasks::core::handlers::{demo_conveyor, DEMO_INPUT, DEMO_OUTPUT};
use practice_tasks::core::{calculator, temperature, top_k};
use practice_tasks::utils::logger;
use practice_tasks::utils::validation::{validate_positive_number, Validate};
use practice_tasks::{
    CliConfig, CurrencyPipeline, ExportConfig, ExportEngine, LocalStorage, SysfsWifi, TaskError,
    WifiService,
};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let outcome = match config.command {
        Command::Calc => calculator::run(std::io::stdin().lock(), std::io::stdout()).map(|_| ()),
        Command::Temperature => temperature::run(std::io::stdin().lock(), std::io::stdout()),
        Command::TopK => top_k::run(std::io::stdin().lock(), std::io::stdout()).map(|_| ()),
        Command::Currency { config } => run_currency(&config).await,
        Command::Conveyor { buffer_size } => run_conveyor(buffer_size).await,
        Command::Wifi { sysfs_root } => run_wifi(&sysfs_root),
    };

    if let Err(e) = outcome {
        report_failure(&e);
    }

    Ok(())
}

async fn run_currency(config_path: &str) -> practice_tasks::Result<()> {
    tracing::info!("📁 Loading configuration from: {}", config_path);
    let config = ExportConfig::from_file(config_path)?;
    config.validate()?;

    let engine = ExportEngine::new(CurrencyPipeline::new(LocalStorage::default(), config));
    let output_path = engine.run().await?;
    println!("{}", output_path);
    Ok(())
}

async fn run_conveyor(buffer_size: usize) -> practice_tasks::Result<()> {
    validate_positive_number("buffer-size", buffer_size, 1)?;
    let conveyor = Arc::new(demo_conveyor(buffer_size));
    let cancel = CancellationToken::new();

    let runner = {
        let conveyor = Arc::clone(&conveyor);
        let cancel = cancel.clone();
        tokio::spawn(async move { conveyor.run(cancel).await })
    };

    let printer = {
        let conveyor = Arc::clone(&conveyor);
        tokio::spawn(async move {
            while let Some(item) = conveyor.recv(DEMO_OUTPUT).await? {
                println!("{}", item);
            }
            Ok::<_, TaskError>(())
        })
    };

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Err(e) = conveyor.send(DEMO_INPUT, line).await {
            // 輸送帶已經因錯誤停止，結果由 runner 回報
            tracing::debug!("Stopped feeding input: {}", e);
            break;
        }
    }
    conveyor.close_all();

    let run_result = runner.await.map_err(|e| TaskError::StageFailed {
        stage: "conveyor".to_string(),
        details: e.to_string(),
    })?;
    printer.await.map_err(|e| TaskError::StageFailed {
        stage: "printer".to_string(),
        details: e.to_string(),
    })??;
    run_result
}

fn run_wifi(sysfs_root: &str) -> practice_tasks::Result<()> {
    let service = WifiService::new(SysfsWifi::new(sysfs_root));
    let interfaces = service.get_interfaces()?;

    if interfaces.is_empty() {
        tracing::info!("No wireless interfaces found under {}", sysfs_root);
    }
    for iface in &interfaces {
        println!("{}\t{}", iface.name, iface.hardware_addr);
    }
    Ok(())
}

fn report_failure(e: &TaskError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Task failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("{}", e.user_friendly_message());

    std::process::exit(e.severity().exit_code())
}
