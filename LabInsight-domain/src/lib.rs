// LabInsight Domain
// This crate contains the report analysis engine for the LabInsight application

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Environment driven analysis settings
pub mod config;

// Health checks and system status
pub mod health;

// Re-export the database module from the data crate for convenience
pub use lab_insight_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
