//! Error types for the mymaps crate

use thiserror::Error;

/// Errors raised while classifying My Maps features
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Feature without a geometry. The exporter never produces these, so
    /// the source document is corrupt and the whole batch is rejected.
    #[error("feature has no geometry")]
    NullGeometry,

    /// Geometry type outside the point / line-string / polygon families
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(&'static str),
}
