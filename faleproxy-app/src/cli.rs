use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Proxy that fetches a page and swaps one university's name for another.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ./faleproxy.yaml when present)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Port to listen on; overrides the config file
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },
    /// Rewrite a local HTML file (or `-` for stdin) and print JSON
    Rewrite {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_port() {
        let cli = Cli::try_parse_from(["faleproxy", "serve", "--port", "4000"]).unwrap();
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Command::Serve { port: Some(4000) }));
    }

    #[test]
    fn parses_rewrite_with_config() {
        let cli =
            Cli::try_parse_from(["faleproxy", "rewrite", "page.html", "-c", "custom.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        match cli.command {
            Command::Rewrite { input } => assert_eq!(input, PathBuf::from("page.html")),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
