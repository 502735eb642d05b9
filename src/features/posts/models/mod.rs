mod post;

pub use post::{MediaKind, NewPost, Post};
