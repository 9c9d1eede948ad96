//! CLI command definitions and parsing
use crate::error::Result;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "solrq",
    version,
    author = "neur0map",
    about = "Translate request parameters into structured Solr queries",
    long_about = "solrq reads a JSON object of request parameters and assembles the Solr query \
                  they describe: field filters, presence checks, date ranges, pagination, sort \
                  order, and the weighted full-text mode selected by the reserved text_full key."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/solrq/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Profile to apply on top of the config file
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble a query from a JSON parameter file
    Build {
        /// Path to a JSON object of parameters, or "-" for stdin
        params: PathBuf,

        /// Index of the first result
        #[arg(long, conflicts_with_all = ["page", "page_size"], requires = "limit")]
        offset: Option<u64>,

        /// Number of results
        #[arg(long, conflicts_with_all = ["page", "page_size"], requires = "offset")]
        limit: Option<u64>,

        /// 1-based page number
        #[arg(long, requires = "page_size")]
        page: Option<u64>,

        /// Results per page
        #[arg(long, requires = "page")]
        page_size: Option<u64>,

        /// Sort keys, e.g. "score desc, name asc" (an empty string clears sorting)
        #[arg(short, long)]
        sort: Option<String>,

        /// Fail on values that cannot be classified instead of dropping them
        #[arg(long)]
        strict: bool,

        /// Print the query as JSON instead of a query string
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Read the raw parameter JSON from a file, or from stdin when the path is "-"
pub fn read_params(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read parameters from stdin")?;
        return Ok(buf);
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file: {:?}", path))?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_args() {
        let cli = Cli::try_parse_from([
            "solrq", "build", "params.json", "--page", "2", "--page-size", "10", "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Build {
                page,
                page_size,
                json,
                offset,
                ..
            } => {
                assert_eq!(page, Some(2));
                assert_eq!(page_size, Some(10));
                assert_eq!(offset, None);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_read_params_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("params.json");
        std::fs::write(&path, r#"{"publisher": "Bloomsbury"}"#).unwrap();

        assert_eq!(read_params(&path).unwrap(), r#"{"publisher": "Bloomsbury"}"#);
    }

    #[test]
    fn test_read_params_missing_file_has_context() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing.json");

        let err = read_params(&path).unwrap_err();
        assert!(matches!(err, crate::error::SolrqError::Other(_)));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_offset_conflicts_with_page() {
        let result = Cli::try_parse_from([
            "solrq", "build", "p.json", "--offset", "0", "--limit", "5", "--page", "1",
            "--page-size", "5",
        ]);
        assert!(result.is_err());
    }
}
