use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use faleproxy_common::observability::{LogConfig, init_logging};
use faleproxy_config::{FaleproxyConfig, FaleproxyConfigLoader};
use faleproxy_rewrite::{Substitution, rewrite_html};
use faleproxy_server::{AppState, ServerSettings};
use serde::Serialize;

use cli::{Cli, Command};
mod cli;

const DEFAULT_CONFIG: &str = "faleproxy.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins over file)
    let cfg = load_config(cli.config.as_deref())?;

    // 2) Logging from the `logging` section
    let log_path = init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr,
        format: cfg.logging.format,
        ..LogConfig::default()
    })?;
    tracing::debug!(path = %log_path.display(), "logging.ready");

    match cli.command {
        Command::Serve { port } => serve(cfg, port).await,
        Command::Rewrite { input } => rewrite(&cfg, &input),
    }
}

fn load_config(path: Option<&Path>) -> Result<FaleproxyConfig> {
    let loader = match path {
        Some(path) => FaleproxyConfigLoader::new().with_file(path),
        None => FaleproxyConfigLoader::new().with_optional_file(DEFAULT_CONFIG),
    };
    loader.load().context("failed to load configuration")
}

async fn serve(cfg: FaleproxyConfig, port: Option<u16>) -> Result<()> {
    let mut settings = ServerSettings::from(&cfg);
    if let Some(port) = port {
        settings.port = port;
    }
    let state = AppState::from_config(&cfg)?;
    faleproxy_server::serve(state, settings).await?;
    Ok(())
}

#[derive(Serialize)]
struct RewriteOutput {
    title: String,
    content: String,
}

fn rewrite(cfg: &FaleproxyConfig, input: &Path) -> Result<()> {
    let html = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };

    let substitution = Substitution::new(&cfg.substitution.source, &cfg.substitution.replacement)?;
    let result = rewrite_html(&html, &substitution);
    tracing::info!(
        input = %input.display(),
        replacements = result.replacements,
        "rewrite.file"
    );

    let out = RewriteOutput {
        title: result.title,
        content: result.html,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
