use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use naavi::advisor::Advisor;
use naavi::backend::HttpBackend;
use naavi::chat;
use naavi::constants;
use naavi::web_server::{self, ServerConfig};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the interview server and host page.
    Serve {
        #[arg(long, default_value = "0.0.0.0", help = "Address to listen on.")]
        host: String,
        #[arg(long, default_value_t = *constants::NAAVI_PORT, help = "Port for the web server.")]
        port: u16,
    },
    /// Open the terminal chat against a running server.
    Chat {
        #[arg(long, default_value_t = constants::NAAVI_URL.clone(), help = "Base URL of the chat server.")]
        url: String,
        #[arg(long, default_value = constants::CHAT_PATH, help = "Endpoint that picked options are posted to.")]
        option_path: String,
        #[arg(long, default_value = ".", help = "Directory for naavi.log.")]
        log_dir: PathBuf,
    },
    /// Send one message and print the resulting conversation entries.
    Say {
        #[arg(long, default_value_t = constants::NAAVI_URL.clone(), help = "Base URL of the chat server.")]
        url: String,
        /// The message to send.
        text: String,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

// The TUI owns the terminal, so logs go to a file instead.
fn init_file_logging(log_dir: &Path) -> Result<WorkerGuard> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("naavi.log")
        .build(log_dir)
        .context("Failed to open log file")?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            init_stderr_logging();
            info!("Starting Naavi server on {}:{}...", host, port);
            let server = web_server::start_web_server(
                &host,
                port,
                ServerConfig::from_env(),
                Advisor::from_env(),
            );

            tokio::select! {
                res = server => res.context("Server stopped")?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl-C received, shutting down");
                }
            }
        }
        Commands::Chat {
            url,
            option_path,
            log_dir,
        } => {
            let _guard = init_file_logging(&log_dir)?;
            info!(%url, "Starting interactive chat session...");
            let backend = HttpBackend::new(&url).with_option_path(&option_path);
            chat::run_chat_tui(backend)
                .await
                .context("Chat session failed")?;
        }
        Commands::Say { url, text } => {
            init_stderr_logging();
            let backend = HttpBackend::new(&url);
            let entries = chat::run_single_turn(&backend, &text)
                .await
                .context("Failed to send message")?;
            for entry in &entries {
                println!("{}", chat::format_entry(entry));
            }
        }
    }

    Ok(())
}
