#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Structure data source loading and normalization logic.
//!
//! Raw JSON inventories pass through shape detection ([`shape`]), field
//! mapping ([`normalize`]), and kind classification ([`classify`]) to
//! produce canonical features. The [`loader`] drives one or two sources
//! concurrently and guarantees the pipeline never comes up empty by
//! falling back to the embedded [`baseline`] dataset per source.

pub mod baseline;
pub mod classify;
pub mod loader;
pub mod normalize;
pub mod registry;
pub mod shape;

/// Errors that can occur during data source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file read failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload's top-level shape is not a bare array, FeatureCollection,
    /// or single Feature. Reported to the user distinctly from transport
    /// failures.
    #[error("Unrecognized top-level shape: {message}")]
    UnrecognizedShape {
        /// Description of the shape that was encountered.
        message: String,
    },
}
