//! Error types
//!
//! Geometry errors are raised while building static geometry (once per track
//! or terrain), never per frame. They indicate broken authored data, so
//! callers should treat them as fatal rather than retry.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Control point data that cannot describe a cubic Bezier spline
    #[error("invalid curve configuration: {0}")]
    InvalidConfiguration(String),
    /// A zero-length tangent made the lateral normal undefined
    #[error("degenerate tangent at t = {t}")]
    DegenerateTangent { t: f64 },
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
