use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "plex-clearlogo",
    version,
    about = "Upload local clear logos to Plex, or look up the ones already applied"
)]
pub struct Cli {
    /// JSON file holding plex_url and plex_token
    #[arg(long, global = true, default_value = "config.json")]
    pub config: String,

    /// Plex server URL (overrides the configuration file)
    #[arg(long, global = true, env = "PLEX_URL")]
    pub plex_url: Option<String>,

    /// Plex token (overrides the configuration file).
    /// Prefer the PLEX_TOKEN environment variable over the flag.
    #[arg(long, global = true, env = "PLEX_TOKEN", hide_env_values = true)]
    pub plex_token: Option<String>,

    /// Log level for diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Match items to local logo files and upload them
    Sync(SyncArgs),
    /// Print (and optionally download) the logo URL of an item
    Url(UrlArgs),
    /// Apply a logo to an item from a remote image URL
    ApplyUrl(ApplyUrlArgs),
}

#[derive(clap::Args, Debug)]
pub struct SyncArgs {
    /// Report every item, not just failures
    #[arg(short, long)]
    pub verbose: bool,

    /// Upload for all items, replacing existing logos
    #[arg(short = 'a', long = "all")]
    pub force: bool,

    /// Search for titles interactively (implies --all and --verbose)
    #[arg(short, long)]
    pub search: bool,

    /// Do not change anything on the server
    #[arg(short, long)]
    pub dry_run: bool,

    /// Delete the mapping file before starting
    #[arg(short, long)]
    pub clear_mapping: bool,

    /// Maximum number of search results in search mode
    #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_results: u32,

    /// JSON file mapping Plex locations to local folders
    #[arg(long, default_value = "local-mapping.json")]
    pub mapping_file: String,

    /// Never prompt for missing mappings; unmapped locations are skipped
    #[arg(long)]
    pub no_prompt: bool,
}

#[derive(clap::Args, Debug)]
pub struct UrlArgs {
    /// Title to search for (prompted when omitted)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Save the logo to this file, or into this directory
    #[arg(long)]
    pub download: Option<String>,

    /// Maximum number of search results
    #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_results: u32,
}

#[derive(clap::Args, Debug)]
pub struct ApplyUrlArgs {
    /// Report what would be applied without contacting the server
    #[arg(short, long)]
    pub dry_run: bool,

    /// Maximum number of search results
    #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_results: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
