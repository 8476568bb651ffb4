pub mod sheets_backend;

pub use sheets_backend::*;
