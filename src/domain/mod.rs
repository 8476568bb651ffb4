pub mod credentials;
pub mod settings;
pub mod sheets;

// Re-export commonly used types
pub use credentials::*;
pub use settings::*;
