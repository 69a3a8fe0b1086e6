// Public entities for the LabInsight API
// Domain report types are serialized as-is; this module holds request shapes
// and the error envelope.

// Common entities for error handling
pub mod common;

// Report upload and export request shapes
pub mod report;
