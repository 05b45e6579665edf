//! Prism DNS dashboard
//!
//! Route table, page titles, page controllers and the WASM entry point of the
//! Prism DNS front end.

// Re-export all prism-dashboard functionality
pub use prism_dashboard::*;
