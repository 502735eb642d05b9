mod legacy_post_handler;

pub use legacy_post_handler::*;
