pub mod aggregate;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod period;
pub mod service;

// Re-export handlers for use in main.rs
pub use handlers::{get_charts, get_summary};
