use anyhow::Result;

use event_search::config::AppConfig;
use event_search::search::SearchQuery;

/// Run a one-shot search from the terminal.
pub async fn search(config: &AppConfig, query: &str, k: Option<i64>) -> Result<()> {
    let service = event_search::build_service(config).await?;

    let query = SearchQuery {
        text: query.to_string(),
        k,
    };
    let hits = service.search_scored(&query).await?;

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", hits.len());

    for (i, hit) in hits.iter().enumerate() {
        let description = hit.item.description();
        let preview = match description.char_indices().nth(120) {
            Some((cut, _)) => format!("{}...", &description[..cut]),
            None => description.to_string(),
        };

        println!(
            "  {}. [{}] {} (distance: {:.4})",
            i + 1,
            hit.item.id(),
            hit.item.title().unwrap_or("(untitled)"),
            hit.distance,
        );
        println!("     {}", preview);
        println!();
    }

    Ok(())
}
