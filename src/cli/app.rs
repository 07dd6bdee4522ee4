//! Main CLI application structure

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::export::{self, ExportArgs};
use super::output::{Output, OutputFormat};
use super::product;
use crate::domain::{ProductChanges, ProductId};
use crate::inventory::Inventory;
use crate::storage::{open_inventory, Config, Project};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(author, version, about = "Local inventory manager backed by SQLite")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Use this database file instead of the current project's
    #[arg(long, global = true, env = "STOCKROOM_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new stockroom project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    #[command(flatten)]
    Inventory(InventoryCommand),
}

/// Commands that work on an existing inventory
#[derive(Subcommand)]
pub enum InventoryCommand {
    /// List all products, ordered by id
    List,

    /// Add a product
    #[command(allow_negative_numbers = true)]
    Add {
        /// Product name
        name: String,

        /// Units on hand
        quantity: i64,

        /// Unit price
        price: f64,

        /// Use this id instead of the next free one
        #[arg(long)]
        id: Option<ProductId>,
    },

    /// Show a single product
    Show {
        /// Product ID
        id: ProductId,
    },

    /// Update one or more fields of a product
    #[command(allow_negative_numbers = true)]
    Update {
        /// Product ID
        id: ProductId,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New quantity
        #[arg(long)]
        quantity: Option<i64>,

        /// New unit price
        #[arg(long)]
        price: Option<f64>,
    },

    /// Set the quantity of a product
    #[command(allow_negative_numbers = true)]
    SetQuantity {
        /// Product ID
        id: ProductId,

        /// New quantity
        quantity: i64,
    },

    /// Set the unit price of a product
    #[command(allow_negative_numbers = true)]
    SetPrice {
        /// Product ID
        id: ProductId,

        /// New unit price
        price: f64,
    },

    /// Remove a product
    Remove {
        /// Product ID
        id: ProductId,
    },

    /// Search products by name (case-insensitive substring)
    Search {
        /// Text to look for (omit to match everything)
        text: Option<String>,
    },

    /// Show products running low
    LowStock {
        /// Quantity at or below which a product is listed
        #[arg(long)]
        threshold: Option<i64>,
    },

    /// Show totals for the whole inventory
    Summary,

    /// Export the inventory to text, JSON or CSV
    Export(ExportArgs),

    /// Reload the cache from the database and report differences
    ///
    /// Every invocation loads a fresh cache, so from the command line this
    /// only reports rows written between loading and reconciling. Library
    /// callers holding a long-lived `Inventory` use it to recover after a
    /// failed store write.
    Reconcile,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => OutputFormat::from(Config::load_global()?.default_format),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("Stockroom starting");

    match cli.command {
        Commands::Init { path } => init(&output, &path, cli.db.as_deref())?,
        Commands::Inventory(command) => execute(command, &output, cli.db.as_deref())?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Runs every command that works on an existing inventory
fn execute(command: InventoryCommand, output: &Output, db: Option<&Path>) -> Result<()> {
    let (mut inventory, config) = open(db)?;
    output.verbose(&format!("Loaded {} product(s)", inventory.len()));

    match command {
        InventoryCommand::List => product::list(output, &inventory)?,

        InventoryCommand::Add {
            name,
            quantity,
            price,
            id,
        } => product::add(output, &mut inventory, name, quantity, price, id)?,

        InventoryCommand::Show { id } => product::show(output, &inventory, id)?,

        InventoryCommand::Update {
            id,
            name,
            quantity,
            price,
        } => {
            let changes = ProductChanges {
                name,
                quantity,
                price,
            };
            product::update(output, &mut inventory, id, changes)?
        }

        InventoryCommand::SetQuantity { id, quantity } => {
            product::set_quantity(output, &mut inventory, id, quantity)?
        }
        InventoryCommand::SetPrice { id, price } => {
            product::set_price(output, &mut inventory, id, price)?
        }

        InventoryCommand::Remove { id } => product::remove(output, &mut inventory, id)?,

        InventoryCommand::Search { text } => {
            product::search(output, &inventory, text.as_deref().unwrap_or_default())?
        }

        InventoryCommand::LowStock { threshold } => {
            let threshold = threshold.unwrap_or(config.project.low_stock_threshold);
            product::low_stock(output, &inventory, threshold)?
        }

        InventoryCommand::Summary => product::summary(output, &inventory)?,

        InventoryCommand::Export(args) => {
            export::run(args, &inventory.list_all(), &config, output)?
        }

        InventoryCommand::Reconcile => product::reconcile(output, &mut inventory)?,
    }

    Ok(())
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "stockroom=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second install (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init(output: &Output, path: &Path, db: Option<&Path>) -> Result<()> {
    if let Some(db) = db {
        output.verbose_ctx("init", &format!("Initializing database at: {}", db.display()));
        open_inventory(db)?;
        output.success(&format!("Initialized inventory database at {}", db.display()));
        return Ok(());
    }

    output.verbose_ctx("init", &format!("Initializing project at: {}", path.display()));
    let project = Project::init(path)?;
    output.verbose_ctx(
        "init",
        &format!("Created .stockroom directory at: {}", project.stockroom_dir().display()),
    );
    output.success(&format!(
        "Initialized stockroom project at {}",
        project.root().display()
    ));
    Ok(())
}

/// Opens the inventory named by `--db`, or the current project's
fn open(db: Option<&Path>) -> Result<(Inventory, Config)> {
    match db {
        Some(path) => Ok((open_inventory(path)?, Config::standalone())),
        None => {
            let project = Project::open_current()?;
            let inventory = project.inventory()?;
            Ok((inventory, project.config().clone()))
        }
    }
}
