pub mod handlers;
mod jwt;
pub mod models;
mod password;
pub mod service;

// Re-export handlers for use in main.rs
pub use handlers::{login, me, register};

// Re-export for use in extractors and startup
pub use jwt::{decode_token, AuthSettings};
