// LabInsight Data
// This crate handles report persistence behind a key-value store abstraction

// Store configuration and SQLite connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
