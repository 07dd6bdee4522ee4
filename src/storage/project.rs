//! Project management
//!
//! Handles project initialization and provides access to the inventory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, SqliteStore};
use crate::inventory::Inventory;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a stockroom project. Run 'stockroom init' first.")]
    NotInProject,
}

/// A Stockroom project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".stockroom").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Existing files are left alone, so running this twice is harmless.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let stockroom_dir = root.join(".stockroom");

        fs::create_dir_all(&stockroom_dir).with_context(|| {
            format!(
                "Failed to create .stockroom directory: {}",
                stockroom_dir.display()
            )
        })?;

        let config_path = stockroom_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Stockroom configuration

# Database file (relative to this directory)
database = "inventory.db"

# Products at or below this quantity are reported by 'stockroom low-stock'
low_stock_threshold = 5

# Default directory for 'stockroom export'
# export_dir = "exports"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = stockroom_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# SQLite journal files
*.db-wal
*.db-shm
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        let project = Self::open(root)?;

        // Creates the database file and the products table
        project.inventory()?;

        Ok(project)
    }

    /// Returns the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .stockroom directory
    pub fn stockroom_dir(&self) -> PathBuf {
        self.root.join(".stockroom")
    }

    /// Returns the project configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Opens the record store and warms the inventory cache
    pub fn inventory(&self) -> Result<Inventory<SqliteStore>> {
        let db_path = self.config.database_path()?;
        open_inventory(&db_path)
    }
}

/// Opens the database at `db_path` and builds an inventory from it
pub fn open_inventory(db_path: &Path) -> Result<Inventory<SqliteStore>> {
    let store = SqliteStore::open(db_path)
        .with_context(|| format!("Failed to open inventory database: {}", db_path.display()))?;

    Inventory::open(store)
        .with_context(|| format!("Failed to load inventory from: {}", db_path.display()))
}
