//! shopcart CLI - Browse the catalog, manage the local cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! shopcart products list --search phone
//! shopcart products show 12
//!
//! # Cart (kept locally, pushed to the backend when logged in)
//! shopcart cart add 12 --quantity 2
//! shopcart cart show
//! shopcart cart set-qty 12 5
//!
//! # Account
//! shopcart login -e user@example.com
//! shopcart whoami
//!
//! # Orders
//! shopcart orders checkout --address "221B Baker Street"
//! ```
//!
//! # Environment Variables
//!
//! See [`shopcart_client::ClientConfig`] for the backend and storage
//! settings. In addition:
//!
//! - `SENTRY_DSN` - Enables error reporting when set
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `RUST_LOG` - Log filter (default: `shopcart_client=info,shopcart_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopcart_client::ClientConfig;
use shopcart_core::{OrderId, ProductId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod console;
mod context;

use context::Context;

#[derive(Parser)]
#[command(name = "shopcart")]
#[command(author, version, about = "shopcart storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List product categories
    Categories,
    /// Log in and store the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and store the session
    Signup {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Full name
        #[arg(short, long)]
        name: String,

        /// Account password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Default shipping address
        #[arg(long)]
        address: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// View and place orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines with the total
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: ProductId,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a cart line (0 removes it)
    SetQty {
        /// Product ID
        product_id: ProductId,

        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
    /// Push the cart to the backend (requires login)
    Sync,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Products per page
        #[arg(long)]
        limit: Option<u32>,

        /// Filter by category ID
        #[arg(long)]
        category: Option<shopcart_core::CategoryId>,

        /// Full-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by brand
        #[arg(short, long)]
        brand: Option<String>,
    },
    /// Show one product
    Show {
        /// Product ID
        product_id: ProductId,
    },
    /// List featured products
    Featured {
        /// Maximum number of products
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Show one order with its items
    Show {
        /// Order ID
        order_id: OrderId,
    },
    /// Place a cash-on-delivery order for the server-side cart
    Checkout {
        /// Shipping address (defaults to the profile address)
        #[arg(short, long)]
        address: Option<String>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN
    let _ = dotenvy::dotenv();

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopcart_client=info,shopcart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if sentry_guard.is_some() {
        tracing::debug!("Sentry initialized");
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        // process::exit skips destructors; flush pending Sentry events first
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let config = ClientConfig::from_env()?;
    let mut ctx = Context::open(&config)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&mut ctx, product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&mut ctx, product_id)?,
            CartAction::SetQty {
                product_id,
                quantity,
            } => commands::cart::set_quantity(&mut ctx, product_id, quantity)?,
            CartAction::Clear => commands::cart::clear(&mut ctx)?,
            CartAction::Sync => commands::cart::sync(&ctx).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List {
                page,
                limit,
                category,
                search,
                brand,
            } => {
                let query = shopcart_client::models::ProductQuery {
                    page,
                    limit,
                    category_id: category,
                    search,
                    brand,
                };
                commands::catalog::list(&ctx, &query).await?;
            }
            ProductsAction::Show { product_id } => commands::catalog::show(&ctx, product_id).await?,
            ProductsAction::Featured { limit } => commands::catalog::featured(&ctx, limit).await?,
        },
        Commands::Categories => commands::catalog::categories(&ctx).await?,
        Commands::Login { email, password } => {
            commands::account::login(&ctx, &email, password).await?;
        }
        Commands::Signup {
            email,
            name,
            password,
            phone,
            address,
        } => {
            let form = commands::account::SignupForm {
                email,
                full_name: name,
                password,
                phone,
                address,
            };
            commands::account::signup(&ctx, form).await?;
        }
        Commands::Logout => commands::account::logout(&ctx)?,
        Commands::Whoami => commands::account::whoami(&ctx).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&ctx).await?,
            OrdersAction::Show { order_id } => commands::orders::show(&ctx, order_id).await?,
            OrdersAction::Checkout { address } => {
                commands::orders::checkout(&mut ctx, address).await?;
            }
        },
    }
    Ok(())
}
