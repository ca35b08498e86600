use anyhow::Context;
use cep_race::adapters::{build_fetchers, http};
use cep_race::core::ConfigProvider;
use cep_race::utils::{error::CepError, logger, validation::Validate};
use cep_race::{CliConfig, LookupEngine, RaceCoordinator, ResultSink, TomlConfig};
use clap::Parser;

fn exit_with(e: &CepError) -> ! {
    tracing::error!(
        "❌ {} (Severity: {:?})",
        e,
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn print_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let endpoints = config.endpoints().context("resolving provider endpoints")?;

    println!("Deadline: {}ms", config.timeout_ms());
    for endpoint in endpoints {
        println!("  {} -> GET {}", endpoint.provider, endpoint.url());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 載入配置並套用命令列覆蓋
    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    logger::init_cli_logger(args.verbose, config.log_level(), args.log_format);
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No request will be sent");
        return print_dry_run(&config);
    }

    let endpoints = match config.endpoints() {
        Ok(endpoints) => endpoints,
        Err(e) => exit_with(&e),
    };

    let client = match http::build_client() {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };

    let coordinator = match RaceCoordinator::new(build_fetchers(&client, &endpoints), config.timeout()) {
        Ok(coordinator) => coordinator,
        Err(e) => exit_with(&e),
    };

    let mut engine = LookupEngine::new(coordinator, ResultSink::stdio());

    match engine.run().await {
        Ok(outcome) if outcome.is_success() => {
            tracing::debug!("✅ Lookup answered by '{}'", outcome.winner().unwrap_or_default());
        }
        Ok(_) => {
            tracing::debug!("Lookup finished without a winner");
        }
        // 只有輸出失敗或序列化失敗會走到這裡
        Err(e) => exit_with(&e),
    }

    Ok(())
}
