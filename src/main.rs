// ABOUTME: Entry point for loanchat — a terminal chat client for loan eligibility questions.
// ABOUTME: Parses CLI args, loads config and logging, then runs the TUI or a one-shot question.

use std::path::PathBuf;

use clap::Parser;

use loanchat::app::App;
use loanchat::chat::Encoding;
use loanchat::config::Config;
use loanchat::logging;

#[derive(Debug, Parser)]
#[command(name = "loanchat", version, about = "Ask loan terms and eligibility questions from the terminal")]
struct Cli {
    /// Chat endpoint URL (overrides config and LOANCHAT_ENDPOINT).
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Send JSON bodies instead of multipart (no attachments).
    #[arg(long)]
    json: bool,

    /// Directory for history and logs.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Clear the stored history before starting.
    #[arg(long)]
    fresh: bool,

    /// Keep history in memory only.
    #[arg(long)]
    no_persist: bool,

    /// Ask a single question, print the reply, and exit.
    #[arg(long, value_name = "TEXT")]
    ask: Option<String>,

    /// Attach a PDF to the one-shot question.
    #[arg(long, value_name = "PATH")]
    pdf: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment config.
    fn apply(&self, config: &mut Config) {
        if let Some(ref endpoint) = self.endpoint {
            config.api.endpoint = endpoint.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.api.timeout_ms = ms;
        }
        if self.json {
            config.api.encoding = Encoding::Json;
        }
        if let Some(ref dir) = self.data_dir {
            config.storage.data_dir = dir.display().to_string();
        }
    }

    fn one_shot(&self) -> bool {
        self.ask.is_some() || self.pdf.is_some()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    let mut config = Config::load()?;
    config.apply_env();
    cli.apply(&mut config);

    if let Err(e) = logging::init(&config.log_path()) {
        eprintln!("Warning: failed to set up logging: {}", e);
    }

    let app = App::new(config, cli.fresh, !cli.no_persist);

    if cli.one_shot() {
        let reply = app
            .ask_once(cli.ask.as_deref().unwrap_or(""), cli.pdf.as_deref())
            .await?;
        println!("{}", reply);
        return Ok(());
    }

    app.run().await
}
