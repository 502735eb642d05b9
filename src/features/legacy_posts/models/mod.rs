mod legacy_post;

pub use legacy_post::{LegacyPost, LegacyPostCatalog};
