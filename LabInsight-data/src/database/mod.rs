// Store configuration and connection modules
pub mod connection;

#[cfg(feature = "sqlite")]
pub mod migrations;

// Re-export connection types and functions
pub use connection::*;
