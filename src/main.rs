mod cli;

use snapvault::config;
use snapvault::ingest::IngestService;
use snapvault::provider::PexelsClient;
use snapvault::server;
use snapvault::storage::CloudinaryClient;
use snapvault_db::pool::init_pool;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;

fn build_service(config: &config::Config) -> Result<Arc<IngestService>> {
    tracing::info!("Initializing database at {}", config.database.path);
    let pool = init_pool(&config.database.path)?;

    let provider = Arc::new(PexelsClient::new(&config.provider));
    let uploader = Arc::new(CloudinaryClient::new(&config.storage));

    Ok(Arc::new(IngestService::new(
        provider,
        uploader,
        pool,
        &config.ingest,
    )))
}

async fn serve(host: String, port: u16, config_path: Option<&std::path::Path>) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config.server.host = host;
    config.server.port = port;

    tracing::info!("Starting snapvault server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let service = build_service(&config)?;

    server::start_server(&config, service).await
}

async fn ingest_once(limit: i64, config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let service = build_service(&config)?;

    let result = service.ingest(limit).await?;

    println!("Ingested {} records", result.limit);
    for record in &result.records {
        println!("  {}  {}", record.id, record.uri);
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "snapvault=trace,snapvault_db=debug,snapvault_common=debug,tower_http=debug"
                .to_string()
        } else {
            "snapvault=debug,snapvault_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(host, port, cli.config.as_deref()))
        }
        Commands::Ingest { limit } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(ingest_once(limit, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("snapvault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Database: {}", config.database.path);
            println!("  Provider: {}", config.provider.base_url);
            println!(
                "  Storage: {}/{}",
                config.storage.base_url, config.storage.cloud_name
            );
            println!("  Hard limit: {}", config.ingest.hard_limit);
            println!(
                "  Max concurrent uploads: {}",
                config.ingest.max_concurrent_uploads
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
