//! storecart CLI - Terminal front-end for the cart widget.
//!
//! # Usage
//!
//! ```bash
//! # List the product cards on the page
//! storecart products
//!
//! # Add three units of a product
//! storecart add alphonso --qty 3
//!
//! # Show the cart (plain text, or the modal's HTML fragment)
//! storecart show
//! storecart show --html
//!
//! # Clear the cart (asks first unless --yes)
//! storecart clear
//!
//! # Drive the widget interactively, one action per line
//! storecart shell
//! ```
//!
//! # Commands
//!
//! - `products` - List product cards with their pending totals
//! - `add` - Add a product through its card's quantity control
//! - `show` - Render the cart view
//! - `count` - Print the cart count badge
//! - `clear` - Clear the cart after confirmation
//! - `shell` - Interactive event loop over widget actions

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use storecart_storefront::{LogFormat, StorecartConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "storecart")]
#[command(author, version, about = "storecart cart widget tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List product cards on the page
    Products {
        /// Print each card's total as an HTML fragment
        #[arg(long)]
        html: bool,
    },
    /// Add a product to the cart
    Add {
        /// Product id as listed by `products`
        id: String,

        /// Quantity as typed into the card's field (clamped to 1-999)
        #[arg(short, long)]
        qty: Option<String>,
    },
    /// Show the cart
    Show {
        /// Print the cart modal's HTML fragment instead of text
        #[arg(long)]
        html: bool,
    },
    /// Print the number of items in the cart
    Count,
    /// Remove every item from the cart
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Drive the widget interactively, one action per line
    Shell,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match StorecartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing with `EnvFilter`, writing to stderr so stdout carries
/// only rendered output.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storecart_cli=info,storecart_storefront=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run(cli: Cli, config: &StorecartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut storefront = storecart_storefront::open(config)?;

    match cli.command {
        Commands::Products { html } => commands::cart::products(&storefront, html)?,
        Commands::Add { id, qty } => commands::cart::add(&mut storefront, &id, qty.as_deref())?,
        Commands::Show { html } => commands::cart::show(&storefront, html)?,
        Commands::Count => commands::cart::count(&storefront),
        Commands::Clear { yes } => commands::cart::clear(&mut storefront, yes)?,
        Commands::Shell => commands::shell::run(&mut storefront).await?,
    }
    Ok(())
}
