//! One-shot search.

use anyhow::{Context, Result};
use bbs_core::client::BoardClient;
use bbs_core::models::CategoryId;
use bbs_core::query::{SearchQuery, SortBy};
use bbs_ui::render;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

pub async fn run(
    client: &BoardClient,
    text: String,
    category: Option<CategoryId>,
    sort: Option<&str>,
) -> Result<()> {
    let sort_by = SortBy::from_param(sort);
    if let Some(mode) = sort
        && mode.parse::<SortBy>().is_err()
    {
        tracing::warn!(mode, fallback = sort_by.as_str(), "unknown sort mode");
    }

    let query = SearchQuery::new(text)
        .with_category(category)
        .with_sort(sort_by);
    if query.is_blank() {
        println!("{}", render::search_prompt().join("\n"));
        return Ok(());
    }
    let label = query.text.clone();

    let results = client
        .search(query, &CancellationToken::new())
        .await
        .with_context(|| format!("search for '{label}'"))?;

    let lines = render::search_results(client.store(), &label, &results, Utc::now());
    println!("{}", lines.join("\n"));
    Ok(())
}
