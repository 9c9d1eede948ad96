use solrq::cli::{read_params, Cli, Commands, ConfigAction};
use solrq::config::Config;
use solrq::error::{Result, SolrqError};
use solrq::{Pagination, ParameterSet, RenderPolicy, SortSpec};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            params,
            offset,
            limit,
            page,
            page_size,
            sort,
            strict,
            json,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            let pagination = match (offset, limit, page, page_size) {
                (Some(offset), Some(limit), _, _) => Some(Pagination::new(offset, limit)),
                (_, _, Some(page), Some(size)) => Some(Pagination::from_page(page, size)),
                _ => None,
            };
            let sort = sort.as_deref().map(SortSpec::parse).transpose()?;
            cmd_build(&config, &params, pagination, sort.as_ref(), strict, json)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, cli.profile, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "solrq=debug" } else { "solrq=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_build(
    config: &Config,
    params_path: &Path,
    pagination: Option<Pagination>,
    sort: Option<&SortSpec>,
    strict: bool,
    json: bool,
) -> Result<()> {
    let raw = read_params(params_path)?;
    let params: ParameterSet = raw.parse()?;

    let mut assembler = config.assembler();
    if strict {
        assembler = assembler.with_policy(RenderPolicy::Strict);
    }

    let Some(query) = assembler.build(Some(&params), pagination, sort)? else {
        return Ok(());
    };

    if json {
        let out = serde_json::to_string_pretty(&query).map_err(|e| SolrqError::Json {
            source: e,
            context: "Failed to serialize query".to_string(),
        })?;
        println!("{}", out);
    } else {
        println!("{}", query.to_query_string());
    }

    Ok(())
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, profile)?;
            let content = toml::to_string_pretty(&config)?;
            println!("{}", content);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
            println!("  Boost fields: {}", config.boosts.len());
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| SolrqError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    let mut config = if path.exists() {
        Config::load(&path)?
    } else {
        tracing::debug!(
            "Config file not found, using defaults. Run 'solrq config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    };

    if let Some(profile) = profile {
        config.apply_profile(&profile)?;
    }

    Ok(config)
}
