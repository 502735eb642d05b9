mod legacy_post_dto;

pub use legacy_post_dto::{LegacyPostListing, LegacyPostsQuery};
