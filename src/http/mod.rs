//! HTTP protocol layer module
//!
//! Response builders, decoupled from pet-store specifics.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_500_response, build_health_response,
    build_html_response,
};
