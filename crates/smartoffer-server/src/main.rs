//! Smart Offer: offer text extraction server.

use std::path::PathBuf;
use std::sync::Arc;

use smartoffer_core::SmartOfferConfig;
use smartoffer_extract::{BrandCatalog, ExtractOptions, OfferExtractor};
use smartoffer_server::{build_router, cli, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("SMARTOFFER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn cli_extractor() -> anyhow::Result<OfferExtractor> {
    let config = SmartOfferConfig::from_env(resolve_data_dir())?;
    let catalog = BrandCatalog::load(&config.data_paths.brands_file);
    Ok(OfferExtractor::new(catalog, ExtractOptions::from(&config)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so CLI output on stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        let text = args[2..].join(" ");
        match args[1].as_str() {
            "extract" => {
                println!("{}", cli::extract_command(&cli_extractor()?, &text)?);
                return Ok(());
            }
            "export" => {
                println!("{}", cli::export_command(&cli_extractor()?, &text)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                cli::print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'smartoffer help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = SmartOfferConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Smart Offer server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
