mod client;
pub mod normalize;

pub use client::{API_KEY_PARAM, CatalogClient, DEFAULT_BASE_URL, UpstreamError, UpstreamOutcome};
