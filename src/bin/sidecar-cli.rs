use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "sidecar-cli")]
#[command(about = "Management CLI for the IPMI collector sidecar", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:9291")]
    url: String,

    /// Admin API key; omit when authentication is disabled.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show brand, bound zone and last update time
    Status,
    /// Apply a collector configuration file to a zone
    Update {
        #[arg(short, long)]
        zone: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Reset the collector configuration to empty
    Reset {
        #[arg(short, long)]
        zone: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))?,
        );
    }

    let res = match cli.command {
        Commands::Status => {
            client
                .get(format!("{}/api/v1/runtime-info", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Update { zone, file } => {
            let yaml = std::fs::read_to_string(&file)?;
            client
                .put(format!("{}/api/v1/config", cli.url))
                .headers(headers)
                .json(&json!({ "zone_id": zone, "yaml": yaml }))
                .send()
                .await?
        }
        Commands::Reset { zone } => {
            client
                .post(format!("{}/api/v1/config/reset", cli.url))
                .headers(headers)
                .json(&json!({ "zone_id": zone }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("OK");
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
