use clap::Parser;
use salary_etl::core::ConfigProvider;
use salary_etl::domain::model::{OutputFormat, SourceSpec};
use salary_etl::utils::{logger, validation::Validate};
use salary_etl::{EtlEngine, LocalStorage, SalaryPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Salary extraction driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "salary-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the record limit from config
    #[arg(long)]
    max_records: Option<usize>,

    /// Show what would be processed without reading any postings
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.log_json() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(max) = args.max_records {
        config.extract.max_records = Some(max);
        tracing::info!("🔧 Max records overridden to: {}", max);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no postings will be read");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path());
    let pipeline = SalaryPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Salary extraction completed");
            println!("✅ Salary extraction completed");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Salary extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    match &config.pipeline.version {
        Some(version) => println!("  Pipeline: {} v{}", config.pipeline.name, version),
        None => println!("  Pipeline: {}", config.pipeline.name),
    }

    match config.source() {
        Some(SourceSpec::Csv { path }) => println!("  Source: CSV file {}", path),
        Some(SourceSpec::Api {
            endpoint, headers, ..
        }) => println!("  Source: {} ({} custom headers)", endpoint, headers.len()),
        None => println!("  Source: <not configured>"),
    }

    let fields = config.field_names();
    println!(
        "  Fields: id={}, description={}",
        fields.id.as_deref().unwrap_or("<row number>"),
        fields.description
    );
    if let Some(max_records) = config.max_records() {
        println!("  Max Records: {}", max_records);
    }
    println!("  Workers: {}", config.workers());

    let extractor = config.extractor_config();
    println!(
        "  Keyword window: {} words, salary word window: {} words",
        extractor.keyword_window, extractor.salary_word_window
    );

    println!("  Output: {}", config.output_path());
    let formats: Vec<&str> = config
        .output_formats()
        .iter()
        .map(|f| match f {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        })
        .collect();
    println!("  Formats: {} + summary", formats.join(", "));
    if let Some(archive) = config.archive_name() {
        println!("  Compression: {} (ZIP)", archive);
    }

    println!();
}
