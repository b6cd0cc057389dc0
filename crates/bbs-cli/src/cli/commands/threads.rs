//! Thread command handlers.

use anyhow::{Result, bail};
use bbs_core::models::ThreadId;
use bbs_core::store::Store;
use bbs_ui::render;
use chrono::Utc;

pub fn list(store: &Store, category: Option<&str>) -> Result<()> {
    let now = Utc::now();
    let lines = match category {
        Some(slug) => {
            if store.category_by_slug(slug).is_none() {
                let known: Vec<&str> = store.categories().iter().map(|c| c.slug.as_str()).collect();
                bail!("Unknown category '{slug}' (known: {})", known.join(", "));
            }
            render::thread_list(store, store.threads_by_category(slug), now)
        }
        None => render::thread_list(store, store.threads(), now),
    };
    println!("{}", lines.join("\n"));
    Ok(())
}

pub fn show(store: &Store, id: ThreadId) {
    println!("{}", render::thread_detail(store, id, None).join("\n"));
}
