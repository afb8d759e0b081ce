use anyhow::Result;

use event_search::catalog;
use event_search::config::AppConfig;

/// Print every catalog item with its title and tags.
pub fn list(config: &AppConfig) -> Result<()> {
    let items = match config.resolved_catalog_path() {
        Some(path) => catalog::load(&path)?,
        None => catalog::builtin()?,
    };

    if items.is_empty() {
        println!("Catalog is empty.");
        return Ok(());
    }

    println!("{} item(s)\n", items.len());
    for item in &items {
        println!(
            "  {:>4}  {}  [{}]",
            item.id(),
            item.title().unwrap_or("(untitled)"),
            item.tags().join(", ")
        );
    }

    Ok(())
}
