use app_status::StatusPath;
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "status-cli")]
#[command(about = "Query a running app-status endpoint", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8180")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the whole status document
    Dump,
    /// Print the entry at a dot-path (e.g. app.uptime_secs)
    Get { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", cli.url.trim_end_matches('/'))).send().await?;
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: status endpoint returned {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }
    let document: Value = res.json().await?;

    match cli.command {
        Commands::Dump => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Commands::Get { path } => {
            let path = StatusPath::parse(&path)?;
            match find(&document, &path) {
                Some(Value::String(s)) => println!("{}", s),
                Some(other) => println!("{}", serde_json::to_string_pretty(other)?),
                None => {
                    eprintln!("Not found: {}", path);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Walk an exported document along `path`.
fn find<'a>(document: &'a Value, path: &StatusPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(document, |node, segment| node.as_object()?.get(segment))
}
