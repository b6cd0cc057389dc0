//! Seed dataset loading and validation.
//!
//! The default dataset is embedded from `seed.json` at compile time. A
//! dataset file with the same shape can replace it (see `Config::data_path`).

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Post, Thread, User};

fn embedded_seed() -> &'static str {
    include_str!("../seed.json")
}

/// The complete set of board entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub threads: Vec<Thread>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Dataset {
    /// Parses and validates the embedded seed dataset.
    pub fn seed() -> Result<Self> {
        Self::from_json(embedded_seed()).context("parse embedded seed dataset")
    }

    /// Loads a dataset from a JSON file. Unlike config, a missing file is an
    /// error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset from {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to load dataset from {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(contents).context("invalid dataset JSON")?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Checks identity and reference invariants.
    pub fn validate(&self) -> Result<()> {
        let user_ids = unique_ids("user", self.users.iter().map(|u| u.id))?;
        let category_ids = unique_ids("category", self.categories.iter().map(|c| c.id))?;
        let thread_ids = unique_ids("thread", self.threads.iter().map(|t| t.id))?;
        let post_ids = unique_ids("post", self.posts.iter().map(|p| p.id))?;

        let mut slugs = HashSet::new();
        for category in &self.categories {
            if category.slug.trim().is_empty() {
                bail!("category {} has an empty slug", category.id);
            }
            if !slugs.insert(category.slug.as_str()) {
                bail!("duplicate category slug '{}'", category.slug);
            }
        }

        for thread in &self.threads {
            if !category_ids.contains(&thread.category_id) {
                bail!(
                    "thread {} references unknown category {}",
                    thread.id,
                    thread.category_id
                );
            }
            if !user_ids.contains(&thread.user_id) {
                bail!(
                    "thread {} references unknown user {}",
                    thread.id,
                    thread.user_id
                );
            }
        }

        for post in &self.posts {
            if !thread_ids.contains(&post.thread_id) {
                bail!(
                    "post {} references unknown thread {}",
                    post.id,
                    post.thread_id
                );
            }
            if !user_ids.contains(&post.user_id) {
                bail!("post {} references unknown user {}", post.id, post.user_id);
            }
            if let Some(target) = &post.reply_to
                && !post_ids.contains(&target.id)
            {
                bail!(
                    "post {} replies to unknown post {}",
                    post.id,
                    target.id
                );
            }
        }

        Ok(())
    }
}

fn unique_ids(kind: &str, ids: impl Iterator<Item = u64>) -> Result<HashSet<u64>> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            bail!("duplicate {kind} id {id}");
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    fn minimal() -> serde_json::Value {
        json!({
            "users": [{
                "id": 1, "name": "a", "email": "a@example.com", "avatar": "",
                "thread_count": 0, "post_count": 0,
                "created_at": "2024-01-01T00:00:00Z",
                "last_activity_at": "2024-01-01T00:00:00Z"
            }],
            "categories": [{ "id": 1, "name": "技術", "slug": "tech", "color": "bg-blue-500" }],
            "threads": [{
                "id": 1, "title": "t", "body": "b", "view_count": 0, "post_count": 0,
                "category_id": 1, "user_id": 1,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }],
            "posts": [{
                "id": 1, "content": "c", "user_id": 1, "thread_id": 1,
                "created_at": "2024-01-01T00:00:00Z"
            }]
        })
    }

    #[test]
    fn test_embedded_seed_is_valid() {
        let dataset = Dataset::seed().unwrap();
        assert_eq!(dataset.users.len(), 4);
        assert_eq!(dataset.categories.len(), 4);
        assert_eq!(dataset.threads.len(), 5);
        assert_eq!(dataset.posts.len(), 11);
    }

    #[test]
    fn test_minimal_dataset_parses() {
        let dataset = Dataset::from_json(&minimal().to_string()).unwrap();
        assert_eq!(dataset.threads[0].title, "t");
        assert!(!dataset.threads[0].is_pinned);
        assert!(dataset.posts[0].reply_to.is_none());
    }

    #[test]
    fn test_rejects_duplicate_thread_id() {
        let mut value = minimal();
        let thread = value["threads"][0].clone();
        value["threads"].as_array_mut().unwrap().push(thread);
        let err = Dataset::from_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("duplicate thread id 1"));
    }

    #[test]
    fn test_rejects_duplicate_slug() {
        let mut value = minimal();
        value["categories"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "id": 2, "name": "x", "slug": "tech", "color": "bg-red-500" }));
        let err = Dataset::from_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("duplicate category slug 'tech'"));
    }

    #[test]
    fn test_rejects_post_in_unknown_thread() {
        let mut value = minimal();
        value["posts"][0]["thread_id"] = json!(9);
        let err = Dataset::from_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("unknown thread 9"));
    }

    #[test]
    fn test_rejects_dangling_reply_target() {
        let mut value = minimal();
        value["posts"][0]["reply_to"] = json!({ "id": 42, "content": "x", "user_id": 1 });
        let err = Dataset::from_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("replies to unknown post 42"));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = Dataset::load_from(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read dataset"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, minimal().to_string()).unwrap();
        let dataset = Dataset::load_from(&path).unwrap();
        assert_eq!(dataset.users[0].email, "a@example.com");
    }
}
