//! Inventory export to text, JSON and CSV
//!
//! Writers take any `io::Write` so the same code serves files and stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use super::output::Output;
use crate::domain::Product;
use crate::storage::Config;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Text,
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Args)]
pub struct ExportArgs {
    /// File format
    #[arg(long, value_enum, default_value = "text")]
    pub to: ExportFormat,

    /// Destination file ("-" for stdout). Defaults to `inventory.<ext>` in
    /// the configured export directory, or stdout when none is configured.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, products: &[Product], config: &Config, output: &Output) -> Result<()> {
    let destination = match (&args.output, &config.project.export_dir) {
        (Some(path), _) if path.as_os_str() == "-" => None,
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => {
            let dir = match &config.project_root {
                Some(root) if dir.is_relative() => root.join(dir),
                _ => dir.clone(),
            };
            Some(dir.join(format!("inventory.{}", args.to.extension())))
        }
        (None, None) => None,
    };

    match destination {
        Some(path) => {
            output.verbose_ctx("export", &format!("Writing {:?} to {}", args.to, path.display()));
            export_to_file(products, args.to, &path)?;

            if output.is_json() {
                output.data(&serde_json::json!({
                    "exported": products.len(),
                    "format": args.to.extension(),
                    "path": path.display().to_string(),
                }));
            } else {
                output.success(&format!(
                    "Exported {} product(s) to {}",
                    products.len(),
                    path.display()
                ));
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_products(products, args.to, &mut writer)?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}

/// Writes `products` to `path`, creating parent directories as needed
pub fn export_to_file(products: &[Product], format: ExportFormat, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write_products(products, format, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write export file: {}", path.display()))
}

pub fn write_products<W: Write>(products: &[Product], format: ExportFormat, writer: &mut W) -> Result<()> {
    match format {
        ExportFormat::Text => write_text(products, writer),
        ExportFormat::Json => write_json(products, writer),
        ExportFormat::Csv => write_csv(products, writer),
    }
}

fn write_text<W: Write>(products: &[Product], writer: &mut W) -> Result<()> {
    if products.is_empty() {
        writeln!(writer, "Inventory is empty.").context("Failed to write text export")?;
        return Ok(());
    }

    for product in products {
        writeln!(writer, "{}", product).context("Failed to write text export")?;
    }
    Ok(())
}

fn write_json<W: Write>(products: &[Product], writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, products).context("Failed to write JSON export")?;
    writeln!(writer).context("Failed to write JSON export")?;
    Ok(())
}

fn write_csv<W: Write>(products: &[Product], writer: &mut W) -> Result<()> {
    writeln!(writer, "id,name,quantity,price").context("Failed to write CSV header")?;

    for product in products {
        writeln!(
            writer,
            "{},{},{},{}",
            product.id,
            csv_quote(&product.name),
            product.quantity,
            product.price
        )
        .context("Failed to write CSV row")?;
    }
    Ok(())
}

/// Quotes a CSV text field, doubling embedded quotes
fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
