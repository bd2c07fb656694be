//! Freshco CLI - drive the storefront stores from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! freshco products --category spices --sort price-low
//! freshco categories
//!
//! # Sign up; the verification code is printed and read back from stdin
//! freshco signup -n "Jane Doe" -e jane@x.com -p secret1
//!
//! # Persisted session (set FRESHCO_SESSION_DIR to keep it between runs)
//! freshco login -e demo@freshco.com -p demo123
//! freshco whoami
//! freshco logout
//!
//! # Scripted walk through every flow
//! freshco demo
//! ```
//!
//! # Commands
//!
//! - `products` - List products with optional filters
//! - `categories` - List product categories
//! - `signup` - Register and verify an account interactively
//! - `login` / `logout` / `whoami` - Manage the persisted session
//! - `demo` - Register, verify, fill a cart and check out

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use freshco_core::PaymentMethod;
use freshco_storefront::services::SortBy;

mod commands;

#[derive(Parser)]
#[command(name = "freshco")]
#[command(author, version, about = "Freshco storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only this category (rice, spices, oil, pulses)
        #[arg(short, long)]
        category: Option<String>,

        /// Minimum unit price, inclusive
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Maximum unit price, inclusive
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Only this weight label (e.g. 1kg)
        #[arg(short, long)]
        weight: Option<String>,

        /// Sort order (`name`, `price-low`, `price-high`)
        #[arg(short, long, default_value = "name")]
        sort: SortBy,
    },
    /// List product categories
    Categories,
    /// Register a new account and verify it with the emailed code
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Ten-digit mobile number; codes are also sent here by SMS
        #[arg(short, long)]
        mobile: Option<String>,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Sign in and persist the session
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show the persisted session
    Whoami,
    /// Walk through registration, cart and checkout
    Demo {
        /// Payment method recorded on the order (`cod`, `upi`, `card`)
        #[arg(long, default_value = "cod")]
        payment: PaymentMethod,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("freshco_storefront=info,freshco_cli=info")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = commands::load_config()?;

    match cli.command {
        Commands::Products {
            category,
            min_price,
            max_price,
            weight,
            sort,
        } => {
            let query = freshco_storefront::services::ProductQuery {
                category,
                min_price,
                max_price,
                weight,
                sort,
            };
            commands::catalog::products(config, &query).await?;
        }
        Commands::Categories => commands::catalog::categories(config).await?,
        Commands::Signup {
            name,
            email,
            mobile,
            password,
        } => {
            commands::session::signup(config, &name, &email, mobile.as_deref(), &password).await?;
        }
        Commands::Login { email, password } => {
            commands::session::login(config, &email, &password).await?;
        }
        Commands::Logout => commands::session::logout(config).await?,
        Commands::Whoami => commands::session::whoami(config).await?,
        Commands::Demo { payment } => commands::demo::run(config, payment).await?,
    }
    Ok(())
}
