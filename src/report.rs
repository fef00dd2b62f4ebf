use crate::error::PhotoreelError;

/// Side-channel for non-fatal errors raised during indexing and rendering.
///
/// Every component takes the sink explicitly instead of logging through a
/// global, so failures stay observable in tests without capturing output.
pub trait ErrorSink {
    fn report(&mut self, err: PhotoreelError);
}

/// Forwards every report to `tracing::error!`.
#[derive(Debug, Default)]
pub struct LogErrorSink;

impl LogErrorSink {
    pub fn new() -> Self {
        Self
    }
}

impl ErrorSink for LogErrorSink {
    fn report(&mut self, err: PhotoreelError) {
        tracing::error!("{err:#}");
    }
}

/// Collects reports in memory for tests and diagnostics.
#[derive(Debug, Default)]
pub struct InMemoryErrorSink {
    errors: Vec<PhotoreelError>,
}

impl InMemoryErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[PhotoreelError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ErrorSink for InMemoryErrorSink {
    fn report(&mut self, err: PhotoreelError) {
        self.errors.push(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_sink_collects_in_order() {
        let mut sink = InMemoryErrorSink::new();
        assert!(sink.is_empty());

        sink.report(PhotoreelError::validation("first"));
        sink.report(PhotoreelError::sink("second"));

        assert_eq!(sink.errors().len(), 2);
        assert!(sink.errors()[0].to_string().contains("first"));
        assert!(sink.errors()[1].to_string().contains("second"));
    }
}
