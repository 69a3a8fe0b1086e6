// LabInsight-api lib.rs
//
// HTTP surface for the LabInsight report analysis engine.

// Public modules
pub mod api;
pub mod entities;
pub mod openapi;
