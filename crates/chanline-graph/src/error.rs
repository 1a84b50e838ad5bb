//! Error types for graph construction and traversal.

/// Errors that can occur while building or walking the upgrade graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A bundle names more than one distinct predecessor across its channels.
    #[error("package \"{package}\" bundle \"{bundle}\" contains {count} replaces, but max of 1 is allowed")]
    TooManyReplaces {
        /// Package of the offending bundle.
        package: String,
        /// Name of the offending bundle.
        bundle: String,
        /// Number of distinct `replaces` values observed.
        count: usize,
    },

    /// Following "replaced by" edges from a bundle led back to it.
    #[error("replaces cycle detected involving bundle \"{bundle}\"")]
    CycleDetected {
        /// The bundle whose descendants loop back to it.
        bundle: String,
    },
}

/// Convenience alias for graph results.
pub type GraphResult<T> = Result<T, GraphError>;
