mod export;
pub mod handlers;
pub mod models;
pub mod service;

// Re-export handlers for use in main.rs
pub use handlers::{
    create_transaction, delete_transaction, export_transactions, list_transactions,
    recent_transactions, update_transaction,
};
