use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Seed data compiled into the binary
const SEED: &str = include_str!("legacy_posts.json");

/// Static text post from the original prototype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LegacyPost {
    pub title: String,
    pub content: String,
}

/// Read-only set of legacy posts keyed by id, built once at startup
#[derive(Debug, Clone)]
pub struct LegacyPostCatalog {
    posts: BTreeMap<u32, LegacyPost>,
}

impl LegacyPostCatalog {
    /// Catalog holding the ten seeded posts
    pub fn seeded() -> Result<Self, serde_json::Error> {
        Self::from_json(SEED)
    }

    /// Parse a JSON object of `{"<id>": {"title": ..., "content": ...}}`
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let posts = serde_json::from_str(raw)?;
        Ok(Self { posts })
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn get(&self, id: i64) -> Option<&LegacyPost> {
        u32::try_from(id).ok().and_then(|id| self.posts.get(&id))
    }

    pub fn all(&self) -> &BTreeMap<u32, LegacyPost> {
        &self.posts
    }

    /// Posts in id order cut like a list prefix: a positive `limit` keeps the
    /// first `limit`, a negative one drops the last `|limit|`
    pub fn prefix(&self, limit: i64) -> Vec<LegacyPost> {
        let len = self.posts.len();
        let magnitude = usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX);
        let take = if limit >= 0 {
            magnitude.min(len)
        } else {
            len.saturating_sub(magnitude)
        };
        self.posts.values().take(take).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let catalog = LegacyPostCatalog::seeded().unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.get(1).unwrap().title, "First Steps");
        assert_eq!(
            catalog.get(10).unwrap().content,
            "Shipped a feature today — progress feels good"
        );
    }

    #[test]
    fn test_get_outside_range() {
        let catalog = LegacyPostCatalog::seeded().unwrap();
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(11).is_none());
        assert!(catalog.get(-1).is_none());
        assert!(catalog.get(i64::MAX).is_none());
    }

    #[test]
    fn test_prefix_is_in_id_order() {
        let catalog = LegacyPostCatalog::seeded().unwrap();
        let titles: Vec<String> = catalog.prefix(3).into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["First Steps", "Learning FastAPI", "Solo Dev Life"]);
        assert_eq!(catalog.prefix(50).len(), 10);
    }

    #[test]
    fn test_negative_prefix_drops_from_the_end() {
        let catalog = LegacyPostCatalog::seeded().unwrap();

        let kept = catalog.prefix(-2);
        assert_eq!(kept.len(), 8);
        assert_eq!(kept[0].title, "First Steps");
        assert_eq!(kept[7], catalog.get(8).unwrap().clone());

        assert!(catalog.prefix(-10).is_empty());
        assert!(catalog.prefix(-20).is_empty());
        assert!(catalog.prefix(i64::MIN).is_empty());
    }

    #[test]
    fn test_from_json_rejects_non_numeric_ids() {
        assert!(LegacyPostCatalog::from_json(r#"{"one": {"title": "t", "content": "c"}}"#).is_err());
    }
}
