use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::legacy_posts::models::{LegacyPost, LegacyPostCatalog};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LegacyPostsQuery {
    /// Positive: first `limit` posts as an array. Negative: all but the last
    /// `|limit|`. 0 or absent: the full mapping.
    pub limit: Option<i64>,
}

/// Response of `GET /posts`
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum LegacyPostListing {
    /// Every post keyed by id
    All(BTreeMap<u32, LegacyPost>),
    /// Posts in id order, cut by `limit`
    Truncated(Vec<LegacyPost>),
}

impl LegacyPostListing {
    pub fn from_catalog(catalog: &LegacyPostCatalog, limit: Option<i64>) -> Self {
        match limit {
            Some(limit) if limit != 0 => Self::Truncated(catalog.prefix(limit)),
            _ => Self::All(catalog.all().clone()),
        }
    }
}
