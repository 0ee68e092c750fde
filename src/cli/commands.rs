use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feedbridge")]
#[command(about = "Follow social platform timelines as ordinary feeds")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link an account from a completed OAuth handshake
    Link {
        /// Access token returned by the handshake
        #[arg(long)]
        token: String,

        /// Access token secret returned by the handshake
        #[arg(long)]
        token_secret: String,

        /// Screen name returned by the handshake
        #[arg(long)]
        screen_name: Option<String>,
    },

    /// Show whether a linked account can service a URL (no network access)
    Check {
        /// Candidate feed URL
        url: String,

        /// Linked account to check with
        #[arg(short, long)]
        account: String,

        /// Username hint overriding the one embedded in the URL
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Add a platform URL as a feed
    Add {
        /// Feed URL to add
        url: String,

        /// Linked account that services the feed
        #[arg(short, long)]
        account: String,

        /// Username hint overriding the one embedded in the URL
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List all feeds
    List,

    /// Remove a feed by ID
    Remove {
        /// Feed ID as shown by `list`
        id: i64,
    },

    /// Show stored items of a feed
    Items {
        /// Feed ID as shown by `list`
        id: i64,

        /// Maximum number of items to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Refresh all feeds and store new items
    Refresh {
        /// Dry run - show new items without storing them
        #[arg(long)]
        dry_run: bool,
    },
}
