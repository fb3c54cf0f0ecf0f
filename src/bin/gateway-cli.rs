use std::time::Instant;

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Client for the document gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the document list for a date (YYYY-MM-DD)
    Fetch { date: String },
    /// Show gateway status and rate window usage
    Status,
    /// Send many sequential requests to watch the rate limiter kick in
    Burst {
        date: String,

        #[arg(short, long, default_value_t = 35)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Fetch { date } => {
            let res = client
                .get(format!("{}/documents/{}", cli.url, date))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Status => {
            let res = client.get(format!("{}/status", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Burst { date, count } => {
            let url = format!("{}/documents/{}", cli.url, date);
            let start = Instant::now();
            for i in 1..=count {
                let sent = Instant::now();
                match client.get(&url).send().await {
                    Ok(res) => {
                        let status = res.status();
                        let body = res.text().await.unwrap_or_default();
                        println!(
                            "[{:>3}] {} after {:>7.2?} (t={:.2?}): {}",
                            i,
                            status,
                            sent.elapsed(),
                            start.elapsed(),
                            body
                        );
                    }
                    Err(e) => eprintln!("[{:>3}] request failed: {}", i, e),
                }
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
