//! # munch CLI Library
//!
//! Headless front end for the Mall Munch cart. Each invocation loads the
//! persisted cart, runs one command, and prints the result as JSON.
//!
//! ## Module Organization
//! ```text
//! munch_cli/
//! ├── lib.rs          ◄─── You are here (argument parsing & dispatch)
//! ├── state.rs        ◄─── Config + file-backed cart store
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   └── checkout.rs ◄─── Order placement
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdout  ◄── pretty JSON: command response, or ApiError on failure     │
//! │  stderr  ◄── tracing output (RUST_LOG, default info,munch=debug)       │
//! │  status  ◄── 0 on success, 1 on any ApiError                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use munch_checkout::{ClientConfig, Credential, CredentialSource, EnvCredential};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::ItemArgs;
use error::ApiError;
use state::AppState;

// =============================================================================
// Arguments
// =============================================================================

/// Mall Munch cart from the command line.
#[derive(Debug, Parser)]
#[command(name = "munch", version, about)]
pub struct Cli {
    /// Config file (default: platform config dir/munch.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding cart.json (overrides config and MUNCH_CART_DIR)
    #[arg(long, global = true)]
    pub cart_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the cart with line and grand totals
    Show,

    /// Add one unit of a menu item
    Add(AddArgs),

    /// Remove one unit of an item
    Dec(ItemRef),

    /// Set an item's quantity
    Set {
        #[command(flatten)]
        item: ItemRef,

        /// New quantity (1-999)
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove an item entirely
    Remove(ItemRef),

    /// Empty the cart
    Clear,

    /// Per-item quantities for one vendor's menu
    Quantities {
        /// Vendor id
        vendor_id: String,
    },

    /// Place the cart as an order
    Checkout {
        /// Auth token (default: MUNCH_AUTH_TOKEN)
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Vendor id
    #[arg(long = "vendor")]
    pub vendor_id: String,

    /// Vendor display name
    #[arg(long)]
    pub vendor_name: Option<String>,

    /// Menu item id
    #[arg(long = "item")]
    pub item_id: String,

    /// Item name
    #[arg(long)]
    pub name: String,

    /// Unit price in rupees, e.g. 12.50
    #[arg(long)]
    pub price: f64,

    /// Mark the item vegetarian
    #[arg(long)]
    pub veg: bool,

    /// Replace a cart that holds another vendor
    #[arg(long)]
    pub replace: bool,
}

#[derive(Debug, Args)]
pub struct ItemRef {
    /// Vendor id
    pub vendor_id: String,

    /// Menu item id
    pub item_id: String,
}

impl From<AddArgs> for ItemArgs {
    fn from(args: AddArgs) -> Self {
        ItemArgs {
            vendor_id: args.vendor_id,
            vendor_name: args.vendor_name,
            item_id: args.item_id,
            name: args.name,
            price: args.price,
            veg: args.veg,
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

/// Parses arguments, runs one command, and prints the outcome.
pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!("Command failed: {}", err);
            match serde_json::to_string_pretty(&err) {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}

/// Runs a parsed command against the configured store.
pub async fn execute(cli: Cli) -> Result<String, ApiError> {
    let config = match cli.config {
        Some(path) => ClientConfig::load(Some(path))?,
        None => ClientConfig::load_or_default(None),
    };
    let state = AppState::open(config, cli.cart_dir)?;

    dispatch(&state, cli.command).await
}

async fn dispatch(state: &AppState, command: Command) -> Result<String, ApiError> {
    use commands::{cart, checkout};

    let mutator = state.mutator();
    match command {
        Command::Show => to_json(&cart::get_cart(&mutator)),
        Command::Add(args) => {
            let replace = args.replace;
            to_json(&cart::add_to_cart(&mutator, args.into(), replace)?)
        }
        Command::Dec(item) => to_json(&cart::decrement_cart_item(
            &mutator,
            &item.vendor_id,
            &item.item_id,
        )?),
        Command::Set { item, quantity } => to_json(&cart::update_cart_item(
            &mutator,
            &item.vendor_id,
            &item.item_id,
            quantity,
        )?),
        Command::Remove(item) => to_json(&cart::remove_from_cart(
            &mutator,
            &item.vendor_id,
            &item.item_id,
        )?),
        Command::Clear => to_json(&cart::clear_cart(&mutator)?),
        Command::Quantities { vendor_id } => {
            to_json(&cart::menu_quantities(&mutator, &vendor_id))
        }
        Command::Checkout { token } => {
            let credential = token
                .map(Credential::new)
                .or_else(|| EnvCredential::default().credential());
            let coordinator = state.coordinator()?;
            info!(endpoint = %state.config().api.base_url, "Checking out");
            to_json(&checkout::place_order(&coordinator, credential.as_ref()).await?)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages from every crate
/// - `RUST_LOG=munch_checkout=trace` - Trace a single crate
/// - Default: INFO, DEBUG for the munch crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,munch=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
