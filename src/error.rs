use thiserror::Error;

use crate::outline::OutlineError;
use crate::transform::TransformError;

/// Errors surfaced by the outline → graph pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Outline(#[from] OutlineError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}
