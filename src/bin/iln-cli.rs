use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "iln-cli")]
#[command(about = "Management CLI for the ILN essence engine", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000", env = "ILN_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Show detected capabilities and selected engines
    Capabilities,
    /// Show process metrics
    Metrics,
    /// Run every essence over some input
    Process {
        /// Input text
        #[arg(short, long)]
        data: String,
        /// secure, fast, reactive, balanced or benchmark
        #[arg(short, long, default_value = "balanced")]
        mode: String,
        /// Parallel workers
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Run the sequential stress test
    Stress {
        /// Number of iterations
        iterations: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Capabilities => client.get(format!("{}/capabilities", base)).send().await?,
        Commands::Metrics => client.get(format!("{}/metrics", base)).send().await?,
        Commands::Process { data, mode, workers } => {
            let mut body = json!({ "data": data, "processing_mode": mode });
            if let Some(workers) = workers {
                body["workers"] = json!(workers);
            }
            client
                .post(format!("{}/process-advanced", base))
                .json(&body)
                .send()
                .await?
        }
        Commands::Stress { iterations } => {
            client
                .get(format!("{}/stress-test/{}", base, iterations))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: engine returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
