pub mod legacy_posts;
pub mod posts;
