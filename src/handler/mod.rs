//! Request handler module
//!
//! Responsible for request routing dispatch and the pet listing endpoints.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
