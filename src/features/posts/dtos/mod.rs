mod post_dto;

pub use post_dto::{FeedResponseDto, PostResponseDto, UploadPostDto};
