//! Pet-store upstream module
//!
//! Everything the service knows about the remote pet-store API:
//! - Typed pet records parsed from `pet/findByStatus`
//! - The status filters exposed as routes
//! - The HTTP client issuing the upstream call
//! - Rendering of pet names into the HTML fragment

mod client;
mod render;

pub use client::PetstoreClient;
pub use render::render_pets;

use serde::Deserialize;
use std::fmt;

/// One pet as returned by the upstream API
///
/// Only `name` is consumed. A missing field and an explicit `null` both
/// deserialize to `None`; every other field is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PetRecord {
    pub name: Option<String>,
}

/// Lifecycle state used as the upstream status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetStatus {
    Available,
    New,
}

impl PetStatus {
    /// Value sent as the `status` query parameter
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::New => "new",
        }
    }

    /// Heading line prepended to the rendered list
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Available => "<h2>Available</h2>",
            Self::New => "<h2>New</h2>",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the records that carry one, in upstream order
pub fn usable_names(records: &[PetRecord]) -> impl Iterator<Item = &str> {
    records.iter().filter_map(|pet| pet.name.as_deref())
}

/// Upstream call failures
#[derive(Debug)]
pub enum PetstoreError {
    /// Connection, TLS, timeout or redirect failure
    Request(reqwest::Error),
    /// Upstream answered with a non-success status
    Status { url: String, status: u16 },
    /// Body is not a JSON array of pet objects
    Decode(serde_json::Error),
}

impl fmt::Display for PetstoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "upstream request failed: {e}"),
            Self::Status { url, status } => {
                write!(f, "upstream {url} returned status {status}")
            }
            Self::Decode(e) => write!(f, "upstream returned malformed JSON: {e}"),
        }
    }
}

impl std::error::Error for PetstoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Status { .. } => None,
        }
    }
}

/// Parse an upstream response body into pet records
pub fn parse_pets(body: &[u8]) -> Result<Vec<PetRecord>, PetstoreError> {
    serde_json::from_slice(body).map_err(PetstoreError::Decode)
}
