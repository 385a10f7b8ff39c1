use thiserror::Error;

/// Pipeline setup and usage errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The route table has no entries; the pipeline would never navigate.
    #[error("route table is empty; register at least one route")]
    EmptyRoutes,

    /// `confirm` was called while no navigation is blocked.
    #[error("nothing to confirm; no navigation is currently blocked")]
    NothingBlocked,
}
