//! # Storage Layer
//!
//! Durable persistence for Stockroom.
//!
//! ## Layout
//!
//! ```text
//! .stockroom/
//! ├── config.toml      # Project configuration
//! ├── inventory.db     # SQLite record store (products table)
//! └── .gitignore       # Ignores SQLite journal files
//! ```
//!
//! ## Schema
//!
//! ```sql
//! products(
//!     id INTEGER PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     quantity INTEGER NOT NULL CHECK (quantity >= 0),
//!     price REAL NOT NULL CHECK (price >= 0)
//! )
//! ```
//!
//! ## Key Types
//!
//! - [`RecordStore`] - Contract the inventory cache writes through to
//! - [`SqliteStore`] - SQLite implementation of [`RecordStore`]
//! - [`Project`] - Entry point for locating the database and configuration
//! - [`Config`] - Project and global configuration

mod config;
mod project;
mod record_store;
mod sqlite;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig};
pub use project::{open_inventory, Project, ProjectError};
pub use record_store::RecordStore;
pub use sqlite::SqliteStore;
