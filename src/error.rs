use crate::Float;
use thiserror::Error;

/// Fatal conditions raised by the particle advance. None of them are
/// recoverable inside the kernel; the driver decides whether to stop or
/// restore a checkpoint.
#[derive(Error, Debug)]
pub enum AdvanceError {
    #[error("Could not allocate accumulation buffer for worker {worker} ({len} cells)")]
    AllocationFailed { worker: usize, len: usize },

    #[error("Non-finite Lorentz factor {gamma} for particle {index}")]
    NonFiniteGamma { index: usize, gamma: Float },

    #[error("Non-finite momentum for particle {index}")]
    NonFiniteMomentum { index: usize },

    #[error("Particle {index} left the renormalization range, x = {x}")]
    PositionOutOfRange { index: usize, x: Float },

    #[error("Boundary compaction inconsistent: np = {np}, kept = {kept}, removed = {removed}")]
    CompactionInconsistent {
        np: usize,
        kept: usize,
        removed: usize,
    },

    #[error("Current grid lock poisoned during merge")]
    MergeLockPoisoned,

    #[error("Could not build worker pool: {0}")]
    WorkerPool(String),

    #[error("Invalid species parameters: {0}")]
    InvalidParams(String),
}

pub type Result<T> = std::result::Result<T, AdvanceError>;
