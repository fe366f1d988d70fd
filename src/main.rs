use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feature_linkage::api;
use feature_linkage::config::{AppConfig, OutputFormat};
use feature_linkage::view::{
    render_feature_view, render_session_view, FeatureLinkageView, FeatureSnapshot,
    SessionDetailView, SessionSnapshot,
};

#[derive(Parser)]
#[command(name = "flink")]
#[command(about = "Classify linked sessions, documents and artifacts of a feature")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a feature snapshot ({feature, sessions, documents})
    Feature {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Group the artifacts of a session snapshot ({artifacts, logs, threads})
    Session {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Serve the classification API over HTTP
    Serve {
        /// Port for HTTP API (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Initialize tracing with output to stderr (for printing commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "feature_linkage=info,tower_http=debug".into()),
    );

    if use_stderr {
        // stdout carries the rendered result
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, Commands::Serve { .. });
    init_tracing(use_stderr);

    let config = AppConfig::load();

    match cli.command {
        Commands::Feature { snapshot, format } => {
            let data = FeatureSnapshot::load(&snapshot).with_context(|| {
                format!("Failed to load feature snapshot {}", snapshot.display())
            })?;
            let view = FeatureLinkageView::build(&data);

            match format.unwrap_or(config.output_format) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
                OutputFormat::Tree => {
                    print!("{}", render_feature_view(&view, &config.view_state()))
                }
            }
        }
        Commands::Session { snapshot, format } => {
            let data = SessionSnapshot::load(&snapshot).with_context(|| {
                format!("Failed to load session snapshot {}", snapshot.display())
            })?;
            let view = SessionDetailView::build(&data);

            match format.unwrap_or(config.output_format) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
                OutputFormat::Tree => print!("{}", render_session_view(&view)),
            }
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let app = api::create_router();

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!("Linkage server listening on http://127.0.0.1:{}", port);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
