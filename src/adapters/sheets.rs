pub mod auth;
pub mod drive;
pub mod google_backend;
pub mod http_client;
pub mod value_range_factory;
