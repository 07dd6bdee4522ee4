//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Read | Served from the cache | `list`, `show`, `search`, `low-stock`, `summary` |
//! | Write | Written through to SQLite | `add`, `update`, `set-quantity`, `set-price`, `remove` |
//! | Maintenance | Export and repair | `export`, `reconcile` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Database Selection
//!
//! Commands use the project found by walking up from the current directory.
//! `--db <PATH>` (or `STOCKROOM_DB`) points at a database file directly.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod export;
mod output;
mod product;

pub use app::{run, Cli, Commands, InventoryCommand};
pub use export::{export_to_file, write_products, ExportFormat};
pub use output::{Output, OutputFormat};
