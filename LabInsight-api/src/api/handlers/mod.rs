pub mod categories;
pub mod health;
pub mod reports;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use categories::get_category_profile;
pub use health::health_check;
pub use reports::{delete_report, export_report, get_report, list_reports, upload_report};
