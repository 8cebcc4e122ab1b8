use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plex_clearlogo::cli::{ApplyUrlArgs, Cli, Command, SyncArgs, UrlArgs};
use plex_clearlogo::config::{ServerConfig, expand_tilde};
use plex_clearlogo::console::TerminalConsole;
use plex_clearlogo::logo_url;
use plex_clearlogo::mapping::{MappingStore, SkipPrompter};
use plex_clearlogo::plex::PlexClient;
use plex_clearlogo::processor::ProcessOptions;
use plex_clearlogo::session::{self, SyncSession};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::load(
        &expand_tilde(&cli.config),
        cli.plex_url.clone(),
        cli.plex_token.clone(),
    )
    .with_context(|| format!("could not load configuration from '{}'", cli.config))?;

    match cli.command {
        Command::Sync(args) => run_sync(&config, args),
        Command::Url(args) => run_url(&config, args),
        Command::ApplyUrl(args) => run_apply_url(&config, args),
    }
}

fn connect(config: &ServerConfig) -> anyhow::Result<PlexClient> {
    println!("\nAttempting to connect to Plex server at {}...", config.url);
    let client = PlexClient::connect(&config.url, &config.token)
        .context("check URL, token, server status, and network connection")?;
    println!(
        "[+] Successfully connected to Plex server: {} (Version: {})",
        client.friendly_name(),
        client.version()
    );
    Ok(client)
}

fn run_sync(config: &ServerConfig, args: SyncArgs) -> anyhow::Result<()> {
    let verbose = args.verbose || args.search;
    let force = args.force || args.search;

    println!("--- Plex Logo Updater (Movies & TV Shows - All Libraries) ---");
    println!("\nRunning with options:");
    println!("  [+] Verbose (-v, --verbose): {verbose}");
    println!("  [+] Upload all (-a, --all): {force}");
    println!("  [+] Search mode (-s, --search): {}", args.search);
    println!("  [+] Dry run (-d, --dry-run): {}", args.dry_run);
    println!("  [+] Clear mapping (-c, --clear-mapping): {}", args.clear_mapping);
    println!("  [+] Max results (-m, --max-results): {}", args.max_results);

    let store = MappingStore::new(expand_tilde(&args.mapping_file));
    if args.clear_mapping {
        if store.clear()? {
            println!("\n[+] Mapping file '{}' has been deleted.", store.path().display());
        } else {
            println!("\n[!] Mapping file '{}' does not exist.", store.path().display());
        }
    }

    let client = connect(config)?;
    let sections = session::eligible_sections(&client).context("could not list libraries")?;

    let mut console = TerminalConsole::new();
    let map = if !args.no_prompt && std::io::stdin().is_terminal() {
        store.load_or_populate(&sections, &mut console)?
    } else {
        store.load_or_populate(&sections, &mut SkipPrompter)?
    };

    let options = ProcessOptions {
        force,
        dry_run: args.dry_run,
        verbose,
        ..ProcessOptions::default()
    };
    let mut sync = SyncSession::new(&client, &sections, &map, options);
    if args.search {
        sync.run_search(&mut console, args.max_results as usize);
    } else {
        sync.run_bulk();
    }

    println!("\n{}", sync.summary());
    println!("\n--- Script Finished ---");
    Ok(())
}

fn run_url(config: &ServerConfig, args: UrlArgs) -> anyhow::Result<()> {
    let client = connect(config)?;
    let sections = session::eligible_sections(&client).context("could not list libraries")?;
    let http = reqwest::blocking::Client::new();
    let download = args.download.as_deref().map(expand_tilde);

    let mut console = TerminalConsole::new();
    logo_url::run_lookup(
        &client,
        &sections,
        &mut console,
        &http,
        args.query,
        download.as_deref(),
        args.max_results as usize,
    );
    println!("Exiting.");
    Ok(())
}

fn run_apply_url(config: &ServerConfig, args: ApplyUrlArgs) -> anyhow::Result<()> {
    println!("--- Plex Logo Updater (Movies & TV Shows) ---");
    let client = connect(config)?;
    let sections = session::eligible_sections(&client).context("could not list libraries")?;

    let mut console = TerminalConsole::new();
    logo_url::run_apply(
        &client,
        &sections,
        &mut console,
        args.dry_run,
        args.max_results as usize,
    );
    println!("\n--- Script Finished ---");
    Ok(())
}
