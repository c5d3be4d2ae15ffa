use std::path::PathBuf;

use clap::Parser;
use wenet_profile_manager::{config, server};

/// WeNet profile manager - REST API over the profiles of the platform users
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file (replaces the environment configuration)
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP server host address
    #[arg(long)]
    http_host: Option<String>,

    /// HTTP server port
    #[arg(long)]
    http_port: Option<u16>,

    /// JSON or YAML file with the profiles to load on startup
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Page size used when a listing request gives no limit
    #[arg(long)]
    default_page_limit: Option<usize>,

    /// Seconds before a request is aborted
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Run server in daemon mode (background process)
    #[arg(long)]
    daemon: bool,
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            http_host: cli.http_host.clone(),
            http_port: cli.http_port,
            seed_file: cli.seed_file.clone(),
            default_page_limit: cli.default_page_limit,
            request_timeout_secs: cli.request_timeout_secs,
            daemon: cli.daemon,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    println!("\nWeNet profile manager v{}\n", env!("CARGO_PKG_VERSION"));

    let base = match cli.config.as_ref() {
        Some(path) => config::ServerConfig::from_yaml_file(path),
        None => config::ServerConfig::from_env(),
    };
    let config = match base.and_then(|base| base.with_cli(config::CliConfig::from(&cli))) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    server::run_with_config(config).await;
}
