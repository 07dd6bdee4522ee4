//! Product CLI commands

use anyhow::Result;

use super::output::Output;
use crate::domain::{InventoryError, NewProduct, Product, ProductChanges, ProductId};
use crate::inventory::Inventory;

pub fn list(output: &Output, inventory: &Inventory) -> Result<()> {
    let products = inventory.list_all();
    output.verbose_ctx("list", &format!("{} product(s) in cache", products.len()));
    output.products(&products, "Inventory is empty.");
    Ok(())
}

pub fn add(
    output: &Output,
    inventory: &mut Inventory,
    name: String,
    quantity: i64,
    price: f64,
    id: Option<ProductId>,
) -> Result<()> {
    let mut product = NewProduct::new(name, quantity, price);
    if let Some(id) = id {
        product = product.with_id(id);
    }

    let added = inventory.add(product)?;

    if output.is_json() {
        output.data(&added);
    } else {
        output.success(&format!("Added product: {}", added));
    }
    Ok(())
}

pub fn show(output: &Output, inventory: &Inventory, id: ProductId) -> Result<()> {
    let product = inventory.get(id).ok_or(InventoryError::NotFound(id))?;

    if output.is_json() {
        output.data(product);
    } else {
        println!("ID:       {}", product.id);
        println!("Name:     {}", product.name);
        println!("Quantity: {}", product.quantity);
        println!("Price:    {:.2}", product.price);
        println!("Value:    {:.2}", product.value());
    }
    Ok(())
}

pub fn update(
    output: &Output,
    inventory: &mut Inventory,
    id: ProductId,
    changes: ProductChanges,
) -> Result<()> {
    output.verbose_ctx("update", &format!("Applying {:?} to product {}", changes, id));
    let updated = inventory.update_fields(id, changes)?;
    report_updated(output, &updated);
    Ok(())
}

pub fn set_quantity(
    output: &Output,
    inventory: &mut Inventory,
    id: ProductId,
    quantity: i64,
) -> Result<()> {
    let updated = inventory.update_quantity(id, quantity)?;
    report_updated(output, &updated);
    Ok(())
}

pub fn set_price(output: &Output, inventory: &mut Inventory, id: ProductId, price: f64) -> Result<()> {
    let updated = inventory.update_price(id, price)?;
    report_updated(output, &updated);
    Ok(())
}

fn report_updated(output: &Output, product: &Product) {
    if output.is_json() {
        output.data(product);
    } else {
        output.success(&format!("Updated product: {}", product));
    }
}

pub fn remove(output: &Output, inventory: &mut Inventory, id: ProductId) -> Result<()> {
    let removed = inventory.remove(id)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": removed.id,
            "name": removed.name,
        }));
    } else {
        output.success(&format!("Removed product {} ({})", removed.id, removed.name));
    }
    Ok(())
}

pub fn search(output: &Output, inventory: &Inventory, text: &str) -> Result<()> {
    let found = inventory.find_by_name(text);
    output.verbose_ctx("search", &format!("'{}' matched {} product(s)", text, found.len()));
    output.products(&found, &format!("No products match '{}'", text));
    Ok(())
}

pub fn low_stock(output: &Output, inventory: &Inventory, threshold: i64) -> Result<()> {
    let low = inventory.low_stock(threshold);
    output.verbose_ctx("low-stock", &format!("threshold={}", threshold));
    output.products(&low, &format!("No products at or below {} unit(s)", threshold));
    Ok(())
}

pub fn summary(output: &Output, inventory: &Inventory) -> Result<()> {
    let products = inventory.len();
    let units = inventory.total_units();
    let value = inventory.total_value();

    if output.is_json() {
        output.data(&serde_json::json!({
            "products": products,
            "units": units_json(units),
            "value": value,
        }));
    } else {
        println!("Inventory Summary");
        println!("{}", "=".repeat(40));
        println!("Products:    {}", products);
        println!("Units:       {}", units);
        println!("Stock value: {:.2}", value);
    }
    Ok(())
}

/// Quantities sum past `i64`; such totals are emitted as a JSON string
fn units_json(units: i128) -> serde_json::Value {
    i64::try_from(units).map_or_else(|_| units.to_string().into(), serde_json::Value::from)
}

pub fn reconcile(output: &Output, inventory: &mut Inventory) -> Result<()> {
    let diverged = inventory.reconcile()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "diverged": diverged,
            "products": inventory.len(),
        }));
    } else if diverged.is_empty() {
        output.success("Cache matches the record store");
    } else {
        let ids: Vec<String> = diverged.iter().map(|id| id.to_string()).collect();
        output.success(&format!(
            "Reloaded {} product(s) from the record store: {}",
            diverged.len(),
            ids.join(", ")
        ));
    }
    Ok(())
}
