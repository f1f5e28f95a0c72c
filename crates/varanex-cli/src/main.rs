use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use varanex_cli::app::{self, Output};
use varanex_core::{ChatApp, Settings, ThemeName};

#[derive(Parser)]
#[command(name = "varanex")]
#[command(about = "VaraNex - chat with the answer service from your terminal")]
#[command(version)]
struct Cli {
    /// Ask a single question in a new conversation and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Base URL of the answer service (overrides VARANEX_API_URL and config)
    #[arg(long)]
    api_url: Option<String>,

    /// Directory holding saved conversations and the theme
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Color theme (light, dark, blue, purple, green); saved for next time
    #[arg(long)]
    theme: Option<ThemeName>,

    /// Keep conversations in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load();
    if let Some(url) = cli.api_url {
        settings.api.base_url = url;
    }
    if let Some(dir) = cli.data_dir {
        settings.storage.data_dir = Some(dir);
    }
    if cli.ephemeral {
        settings.storage.ephemeral = true;
    }

    let app = ChatApp::from_settings(&settings).context("failed to open conversation storage")?;
    if let Some(theme) = cli.theme {
        if let Err(e) = app.set_theme(theme) {
            tracing::warn!("Failed to save theme: {e}");
        }
    }

    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
    let output = Output::new(app.theme(), color);

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(&app, &prompt, output).await?;
    } else {
        app::run_repl(Arc::new(app), output).await?;
    }

    Ok(())
}
