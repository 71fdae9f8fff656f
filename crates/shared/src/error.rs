use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`crate::curate`].
///
/// Stories dropped for data-quality reasons are not errors; they show up in
/// [`crate::CurationReport`] instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurationError {
    #[error("selection limit must be at least 1")]
    InvalidLimit,

    #[error("no viable stories among {received} received")]
    NoViableItems { received: usize },
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse font file: {}", path.display())]
    Parse { path: PathBuf },
}
