use clap::Parser;
use practice_tasks::core::Pipeline;
use practice_tasks::utils::{logger, validation::Validate};
use practice_tasks::{CurrencyPipeline, ExportConfig, ExportEngine, LocalStorage};

#[derive(Parser)]
#[command(name = "currency-export")]
#[command(about = "Convert a ValCurs currency XML feed into JSON sorted by rate")]
struct Args {
    /// Path to YAML or TOML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dry run - show what would be converted without writing output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting currency export");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入設定檔
    let config = match ExportConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    };

    // 驗證設定
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    tracing::info!("  📄 input-file:  {}", config.input_file);
    tracing::info!("  📄 output-file: {}", config.output_file);

    let pipeline = CurrencyPipeline::new(LocalStorage::default(), config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - output file will not be written");
        let feed = pipeline.extract().await?;
        let currencies = pipeline.transform(feed).await?;
        println!(
            "Would write {} currencies to {}",
            currencies.len(),
            pipeline.config().output_file
        );
        for currency in currencies.iter().take(5) {
            println!(
                "  {} ({:03}): {}",
                currency.char_code, currency.num_code, currency.value
            );
        }
        return Ok(());
    }

    let engine = ExportEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Currency export completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Currency export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}
