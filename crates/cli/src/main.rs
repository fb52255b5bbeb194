//! MyShop CLI - drive the storefront from the command line.
//!
//! Each invocation is one page load: the catalog and cart are fetched, one
//! user event is dispatched, the rendered page is written to `--out`, and
//! the resulting notices are printed.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog, filtered
//! myshop browse --search chai --category 2
//!
//! # Open a product with its reviews
//! myshop product 7
//!
//! # Add to the cart and view it
//! myshop add 7 --quantity 2
//! myshop cart
//!
//! # Sign in and place an order
//! MYSHOP_PASSWORD=... myshop login --email shopper@example.com
//! myshop checkout
//! ```
//!
//! # Environment Variables
//!
//! - `MYSHOP_API_BASE_URL` - Backend base URL
//! - `MYSHOP_DATA_DIR` - Where the cart and session are kept
//! - `MYSHOP_PAYMENT_METHOD` - Default payment method for checkout
//! - `MYSHOP_PASSWORD` - Password for `login`
//! - `RUST_LOG` - Log filter (default `myshop_storefront=info,myshop_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use myshop_core::{CategoryId, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "myshop")]
#[command(author, version, about = "MyShop storefront client")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Where to write the rendered page
    #[arg(long, global = true, default_value = "myshop.html")]
    out: PathBuf,

    /// Backend base URL (overrides `MYSHOP_API_BASE_URL`)
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Directory for the cart and session (overrides `MYSHOP_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the catalog
    Browse {
        /// Case-insensitive text matched against name and description
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only show this category
        #[arg(short, long)]
        category: Option<CategoryId>,
    },
    /// Open a product with its reviews
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Add a product to the cart
    Add {
        /// Product ID
        id: ProductId,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Show the cart
    Cart,
    /// Place an order for the server cart
    Checkout {
        /// Payment method (overrides `MYSHOP_PAYMENT_METHOD`)
        #[arg(long)]
        payment_method: Option<String>,
    },
    /// Sign in and keep the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(long, env = "MYSHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the session
    Logout,
    /// Probe the backend
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env before parsing so env-backed arguments see it
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("myshop_storefront=info,myshop_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let global = cli.global;
    match cli.command {
        Commands::Browse { search, category } => {
            commands::catalog::browse(&global, &search, category).await?;
        }
        Commands::Product { id } => commands::catalog::product(&global, id).await?,
        Commands::Add { id, quantity } => commands::cart::add(&global, id, quantity).await?,
        Commands::Cart => commands::cart::show(&global).await?,
        Commands::Checkout { payment_method } => {
            commands::cart::checkout(&global, payment_method).await?;
        }
        Commands::Login { email, password } => {
            commands::session::login(&global, &email, &SecretString::from(password)).await?;
        }
        Commands::Logout => commands::session::logout(&global).await?,
        Commands::Health => commands::session::health(&global).await?,
    }
    Ok(())
}
