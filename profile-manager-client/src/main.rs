use clap::Parser;
use reqwest::Client;

use profile_manager_client::{run_virtual_user, Report, ScenarioConfig};

/// Load-test scenario runner for the WeNet profile manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the profile manager API
    #[arg(
        short,
        long,
        env = "PROFILE_MANAGER_API",
        default_value = "http://localhost:8080"
    )]
    url: String,

    /// Number of concurrent virtual users
    #[arg(long, default_value_t = 1)]
    vus: usize,

    /// Scenario runs per virtual user
    #[arg(long, default_value_t = 1)]
    iterations: usize,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let client = Client::new();

    println!(
        "\nRunning {} virtual user(s) x {} iteration(s) against {}\n",
        args.vus, args.iterations, args.url
    );

    let config = ScenarioConfig::new(&args.url, args.iterations);
    let handles: Vec<_> = (0..args.vus.max(1))
        .map(|_| tokio::spawn(run_virtual_user(client.clone(), config.clone())))
        .collect();

    let mut report = Report::new();
    for handle in handles {
        match handle.await {
            Ok(vu_report) => report.merge(vu_report),
            Err(e) => report.record_error(format!("Virtual user aborted: {}", e)),
        }
    }

    println!("{}", report);
    if !report.all_passed() {
        std::process::exit(1);
    }
}
