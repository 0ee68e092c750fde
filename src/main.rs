use std::collections::BTreeSet;
use std::time::Duration;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use feedbridge::cli::{Cli, Commands};
use feedbridge::config::Config;
use feedbridge::domain::NormalizedItem;
use feedbridge::errors::{BridgeError, BridgeResult};
use feedbridge::oauth::{HandshakeResult, SignedHttpClient};
use feedbridge::providers::twitter::TwitterFeedProvider;
use feedbridge::providers::{Ability, ProviderRegistry};
use feedbridge::services::{FeedService, RefreshService};
use feedbridge::storage::{
    SqliteCredentialStore, SqliteFeedRepository, SqliteItemRepository, SqliteStorage,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> BridgeResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)?;
    let feed_repo = SqliteFeedRepository::new(storage.clone());
    let credential_store = SqliteCredentialStore::new(storage.clone());

    match cli.command {
        Commands::Link {
            token,
            token_secret,
            screen_name,
        } => cmd_link(token, token_secret, screen_name, &config, &credential_store),
        Commands::Check { url, account, user } => {
            cmd_check(&url, &account, user.as_deref(), feed_repo, &config, &credential_store)
        }
        Commands::Add { url, account, user } => {
            cmd_add(&url, &account, user.as_deref(), feed_repo, &config, &credential_store).await
        }
        Commands::List => cmd_list(feed_repo),
        Commands::Remove { id } => cmd_remove(id, feed_repo),
        Commands::Items { id, limit } => cmd_items(id, limit, &storage),
        Commands::Refresh { dry_run } => {
            cmd_refresh(&storage, &config, &credential_store, dry_run).await
        }
    }
}

fn http_timeout(config: &Config) -> Duration {
    Duration::from_secs(config.http_timeout_secs)
}

/// Rehydrate providers for `accounts`, warning about any that lack stored tokens
fn load_registry(
    accounts: &[String],
    config: &Config,
    store: &SqliteCredentialStore,
) -> (ProviderRegistry, Vec<String>) {
    let timeout = http_timeout(config);
    let (registry, missing) = ProviderRegistry::with_twitter_accounts(
        accounts,
        &config.api_keys(),
        &config.api_base,
        store,
        |credentials| SignedHttpClient::new(credentials, timeout),
    );

    for account in &missing {
        warn!(account = %account, "no stored credentials, account skipped");
    }

    (registry, missing)
}

fn single_account_registry(
    account: &str,
    config: &Config,
    store: &SqliteCredentialStore,
) -> BridgeResult<ProviderRegistry> {
    let (registry, missing) = load_registry(&[account.to_string()], config, store);

    if !missing.is_empty() {
        return Err(BridgeError::NoLinkedAccount(account.to_string()));
    }

    Ok(registry)
}

fn cmd_link(
    token: String,
    token_secret: String,
    screen_name: Option<String>,
    config: &Config,
    store: &SqliteCredentialStore,
) -> BridgeResult<()> {
    let mut handshake = HandshakeResult::new(token, token_secret);
    if let Some(name) = screen_name {
        handshake = handshake.with_parameter("screen_name", name);
    }

    let timeout = http_timeout(config);
    let outcome = TwitterFeedProvider::from_handshake(&handshake, &config.api_keys(), store, |credentials| {
        SignedHttpClient::new(credentials, timeout)
    })
    .ok_or_else(|| BridgeError::InvalidInput("handshake did not return a screen name".to_string()))?;

    let screen_name = outcome.provider.screen_name();

    match outcome.persisted {
        Ok(()) => println!("Linked @{}", screen_name),
        Err(e) => {
            warn!(account = %screen_name, error = %e, "credentials not persisted");
            println!("Linked @{} for this session only: {}", screen_name, e);
            println!("Link the account again once storage is available.");
        }
    }

    Ok(())
}

fn cmd_check(
    url: &str,
    account: &str,
    user: Option<&str>,
    feed_repo: SqliteFeedRepository,
    config: &Config,
    store: &SqliteCredentialStore,
) -> BridgeResult<()> {
    let registry = single_account_registry(account, config, store)?;
    let service = FeedService::new(feed_repo, registry);

    // Only `account` is registered, so no match means it cannot service the URL
    let ability = service
        .check(url, user)
        .map(|(_, ability)| ability)
        .unwrap_or(Ability::NotApplicable);

    println!("{}: {} (@{})", url, ability, account);

    Ok(())
}

async fn cmd_add(
    url: &str,
    account: &str,
    user: Option<&str>,
    feed_repo: SqliteFeedRepository,
    config: &Config,
    store: &SqliteCredentialStore,
) -> BridgeResult<()> {
    let registry = single_account_registry(account, config, store)?;
    let service = FeedService::new(feed_repo, registry);

    println!("Resolving feed: {}", url);

    match service.add(url, user).await {
        Ok(feed) => {
            println!("Feed added successfully!");
            println!("  Name: {}", feed.name);
            println!("  Account: @{}", feed.account);
            if let Some(icon) = &feed.icon_url {
                println!("  Icon: {}", icon);
            }
            Ok(())
        }
        Err(BridgeError::FeedAlreadyExists(_)) => {
            println!("Feed already exists: {}", url);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn cmd_list(feed_repo: SqliteFeedRepository) -> BridgeResult<()> {
    let service = FeedService::offline(feed_repo);
    let feeds = service.list()?;

    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    println!("Configured feeds:\n");
    for feed in feeds {
        let id = feed.id.map(|id| id.to_string()).unwrap_or_default();
        println!("  {}. {} [{} @{}]", id, feed.name, feed.provider, feed.account);
        println!("    URL: {}", feed.url);
        println!();
    }

    Ok(())
}

fn cmd_remove(id: i64, feed_repo: SqliteFeedRepository) -> BridgeResult<()> {
    let service = FeedService::offline(feed_repo);
    let feed = service
        .get(id)?
        .ok_or_else(|| BridgeError::FeedNotFound(id.to_string()))?;

    service.remove(id)?;
    println!("Removed: {}", feed.name);

    Ok(())
}

fn cmd_items(id: i64, limit: usize, storage: &SqliteStorage) -> BridgeResult<()> {
    let feed = FeedService::offline(SqliteFeedRepository::new(storage.clone()))
        .get(id)?
        .ok_or_else(|| BridgeError::FeedNotFound(id.to_string()))?;

    let service = RefreshService::offline(
        SqliteFeedRepository::new(storage.clone()),
        SqliteItemRepository::new(storage.clone()),
    );
    let items = service.recent(&feed, limit)?;

    if items.is_empty() {
        println!("No stored items for {}.", feed.name);
        return Ok(());
    }

    println!("{} ({} items):\n", feed.name, items.len());
    for item in &items {
        print_item(item, "");
    }

    Ok(())
}

fn print_item(item: &NormalizedItem, marker: &str) {
    let author = item
        .authors
        .first()
        .and_then(|a| a.name.as_deref())
        .unwrap_or("unknown");
    let published = item
        .date_published
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    println!("  {}[{}] {}: {}", marker, published, author, item.content_text);
    println!("    {}", item.url);
}

async fn cmd_refresh(
    storage: &SqliteStorage,
    config: &Config,
    store: &SqliteCredentialStore,
    dry_run: bool,
) -> BridgeResult<()> {
    let feeds = FeedService::offline(SqliteFeedRepository::new(storage.clone())).list()?;

    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    let accounts: Vec<String> = feeds
        .iter()
        .map(|feed| feed.account.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let (registry, _) = load_registry(&accounts, config, store);

    let service = RefreshService::new(
        SqliteFeedRepository::new(storage.clone()),
        SqliteItemRepository::new(storage.clone()),
        registry,
    );

    println!("Refreshing {} feeds...\n", feeds.len());

    let results = service.fetch_all_unseen().await?;

    if results.is_empty() {
        println!("No new items.");
        return Ok(());
    }

    let mut total = 0;

    for (feed, items) in &results {
        println!("{} ({} new items):", feed.name, items.len());

        let marker = if dry_run { "[DRY RUN] " } else { "" };
        for item in items {
            print_item(item, marker);
        }

        if !dry_run {
            total += service.save(feed, items)?;
        }

        println!();
    }

    if dry_run {
        println!(
            "Dry run complete. Would store {} items.",
            results.iter().map(|(_, items)| items.len()).sum::<usize>()
        );
    } else {
        println!("Stored {} items.", total);
    }

    Ok(())
}
