// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for candidate detection.

use thiserror::Error;

/// Errors reported by the candidate pipeline.
///
/// Precondition violations (querying an unbuilt broad phase, asking the mapper for an
/// edge id of a vertex) panic instead; these variants cover recoverable conditions.
#[derive(Debug, Error)]
pub enum CandidateError {
    /// A flat index past the end of a [`Candidates`](crate::Candidates) set.
    #[error("candidate index {index} is out of range for a set of {len}")]
    OutOfRange {
        /// The requested flat index.
        index: usize,
        /// Number of candidates in the set.
        len: usize,
    },

    /// Mesh data is malformed or inconsistent.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// The inflation radius is negative or not a number.
    #[error("inflation radius must be a non-negative number, got {0}")]
    InvalidInflation(f64),

    /// I/O operation failed (debug export).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, CandidateError>`.
pub type CandidateResult<T> = Result<T, CandidateError>;
