use std::path::PathBuf;

pub type PhotoreelResult<T> = Result<T, PhotoreelError>;

/// Errors raised while indexing and rendering photos.
///
/// None of these are fatal to a render pass: the driver reports them to an
/// [`ErrorSink`](crate::ErrorSink) and moves on to the next photo or bucket.
#[derive(thiserror::Error, Debug)]
pub enum PhotoreelError {
    #[error("'{0}' is not a directory")]
    DirectoryNotFound(PathBuf),

    #[error("no capture timestamp for photo '{0}'")]
    TimestampUnresolved(PathBuf),

    #[error("failed to decode photo '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("frame sink rejected frame: {0}")]
    Sink(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PhotoreelError {
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
