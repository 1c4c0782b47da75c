mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use propconnect_client::{Frequency, InquiryStatus, ListingType, PrincipalKind, PropertyType};
use propconnect_config::load as load_config;
use propconnect_runtime::{telemetry, AppContext};
use tracing::debug;

#[derive(Parser)]
#[command(name = "propconnect")]
#[command(about = "Browse listings and manage a PropConnect account from the terminal")]
#[command(version)]
struct Cli {
    /// Backend base URL; overrides configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as a seeker, agent or admin
    Login {
        #[arg(long = "as", default_value = "user")]
        kind: PrincipalKind,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PROPCONNECT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a seeker or agent account
    Register {
        #[arg(long = "as", default_value = "user")]
        kind: PrincipalKind,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PROPCONNECT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        license_number: Option<String>,
        #[arg(long)]
        brokerage: Option<String>,
        #[arg(long)]
        years_experience: Option<u32>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Manage saved listings
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Notification preferences
    Preferences {
        #[command(subcommand)]
        action: PreferencesAction,
    },
    /// Listing details
    Property {
        #[command(subcommand)]
        action: PropertyAction,
    },
    /// Search active listings
    Search {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        bedrooms: Option<u32>,
        #[arg(long = "type")]
        property_type: Option<PropertyType>,
        #[arg(long = "listing")]
        listing_type: Option<ListingType>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Agent inquiry inbox
    Inquiries {
        #[arg(long)]
        status: Option<InquiryStatus>,
        /// Open a thread, marking it read
        #[arg(long)]
        open: Option<String>,
        /// Reply to the opened thread
        #[arg(long, requires = "open")]
        reply: Option<String>,
    },
    /// Ask the listing agent a question
    Contact {
        property_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: String,
    },
    /// Curate homepage featured listings (admin)
    Featured {
        #[command(subcommand)]
        action: FeaturedAction,
    },
    /// Agent dashboard counters
    Dashboard {
        /// Keep refreshing until interrupted
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    Add { property_id: String },
    Remove { property_id: String },
}

#[derive(Subcommand)]
enum PreferencesAction {
    Show,
    SetFrequency { frequency: Frequency },
}

#[derive(Subcommand)]
enum PropertyAction {
    Show { property_id: String },
}

#[derive(Subcommand)]
enum FeaturedAction {
    List,
    Add { property_id: String },
    Remove { featured_id: String },
    /// Move an entry; positions are 1-based
    Move { from: usize, to: usize },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing_with_default("warn").context("failed to initialise tracing")?;

    let mut config = load_config().context("failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url.trim_end_matches('/').to_string();
    }
    debug!(base_url = %config.api.base_url, "configuration loaded");

    let context = AppContext::initialise(&config)
        .await
        .context("failed to initialise propconnect")?;

    let outcome = commands::run(&context, cli.command).await;
    commands::print_toasts(&context.store);
    outcome
}
