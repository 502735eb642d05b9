pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;

pub use models::LegacyPostCatalog;
pub use routes::routes;
