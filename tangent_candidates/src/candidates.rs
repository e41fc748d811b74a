// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The candidate set produced by one detection pass.

use crate::candidate::{
    ContinuousCandidate, EdgeEdgeCandidate, EdgeFaceCandidate, EdgeVertexCandidate,
    FaceVertexCandidate, VertexVertexCandidate,
};
use crate::error::{CandidateError, CandidateResult};

/// Candidates of every kind, grouped by variant.
///
/// The flat index used by [`at`](Self::at) and [`iter`](Self::iter) walks the groups in
/// a fixed order: edge-vertex, edge-edge, face-vertex, edge-face, vertex-vertex.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidates {
    /// Edge-vertex candidates.
    pub ev: Vec<EdgeVertexCandidate>,
    /// Edge-edge candidates.
    pub ee: Vec<EdgeEdgeCandidate>,
    /// Face-vertex candidates.
    pub fv: Vec<FaceVertexCandidate>,
    /// Edge-face candidates.
    pub ef: Vec<EdgeFaceCandidate>,
    /// Vertex-vertex candidates.
    pub vv: Vec<VertexVertexCandidate>,
}

/// Shared view of one candidate in a [`Candidates`] set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CandidateRef<'a> {
    /// An edge-vertex candidate.
    EdgeVertex(&'a EdgeVertexCandidate),
    /// An edge-edge candidate.
    EdgeEdge(&'a EdgeEdgeCandidate),
    /// A face-vertex candidate.
    FaceVertex(&'a FaceVertexCandidate),
    /// An edge-face candidate.
    EdgeFace(&'a EdgeFaceCandidate),
    /// A vertex-vertex candidate.
    VertexVertex(&'a VertexVertexCandidate),
}

impl<'a> CandidateRef<'a> {
    /// The candidate as a CCD query, for the variants that have one.
    pub fn as_continuous(self) -> Option<&'a dyn ContinuousCandidate> {
        match self {
            Self::EdgeVertex(c) => Some(c),
            Self::EdgeEdge(c) => Some(c),
            Self::FaceVertex(c) => Some(c),
            Self::EdgeFace(_) | Self::VertexVertex(_) => None,
        }
    }
}

/// Exclusive view of one candidate in a [`Candidates`] set.
#[derive(Debug, PartialEq, Eq)]
pub enum CandidateMut<'a> {
    /// An edge-vertex candidate.
    EdgeVertex(&'a mut EdgeVertexCandidate),
    /// An edge-edge candidate.
    EdgeEdge(&'a mut EdgeEdgeCandidate),
    /// A face-vertex candidate.
    FaceVertex(&'a mut FaceVertexCandidate),
    /// An edge-face candidate.
    EdgeFace(&'a mut EdgeFaceCandidate),
    /// A vertex-vertex candidate.
    VertexVertex(&'a mut VertexVertexCandidate),
}

impl Candidates {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of candidates across all kinds.
    pub fn len(&self) -> usize {
        self.ev.len() + self.ee.len() + self.fv.len() + self.ef.len() + self.vv.len()
    }

    /// True if no kind holds any candidate.
    pub fn is_empty(&self) -> bool {
        self.ev.is_empty()
            && self.ee.is_empty()
            && self.fv.is_empty()
            && self.ef.is_empty()
            && self.vv.is_empty()
    }

    /// Remove every candidate, keeping allocations.
    pub fn clear(&mut self) {
        self.ev.clear();
        self.ee.clear();
        self.fv.clear();
        self.ef.clear();
        self.vv.clear();
    }

    /// The candidate at flat index `i`.
    pub fn at(&self, i: usize) -> CandidateResult<CandidateRef<'_>> {
        let mut k = i;
        if k < self.ev.len() {
            return Ok(CandidateRef::EdgeVertex(&self.ev[k]));
        }
        k -= self.ev.len();
        if k < self.ee.len() {
            return Ok(CandidateRef::EdgeEdge(&self.ee[k]));
        }
        k -= self.ee.len();
        if k < self.fv.len() {
            return Ok(CandidateRef::FaceVertex(&self.fv[k]));
        }
        k -= self.fv.len();
        if k < self.ef.len() {
            return Ok(CandidateRef::EdgeFace(&self.ef[k]));
        }
        k -= self.ef.len();
        self.vv
            .get(k)
            .map(CandidateRef::VertexVertex)
            .ok_or(CandidateError::OutOfRange {
                index: i,
                len: self.len(),
            })
    }

    /// Mutable access to the candidate at flat index `i`.
    pub fn at_mut(&mut self, i: usize) -> CandidateResult<CandidateMut<'_>> {
        let len = self.len();
        let mut k = i;
        if k < self.ev.len() {
            return Ok(CandidateMut::EdgeVertex(&mut self.ev[k]));
        }
        k -= self.ev.len();
        if k < self.ee.len() {
            return Ok(CandidateMut::EdgeEdge(&mut self.ee[k]));
        }
        k -= self.ee.len();
        if k < self.fv.len() {
            return Ok(CandidateMut::FaceVertex(&mut self.fv[k]));
        }
        k -= self.fv.len();
        if k < self.ef.len() {
            return Ok(CandidateMut::EdgeFace(&mut self.ef[k]));
        }
        k -= self.ef.len();
        self.vv
            .get_mut(k)
            .map(CandidateMut::VertexVertex)
            .ok_or(CandidateError::OutOfRange { index: i, len })
    }

    /// Every candidate in flat index order.
    pub fn iter(&self) -> impl Iterator<Item = CandidateRef<'_>> + '_ {
        self.ev
            .iter()
            .map(CandidateRef::EdgeVertex)
            .chain(self.ee.iter().map(CandidateRef::EdgeEdge))
            .chain(self.fv.iter().map(CandidateRef::FaceVertex))
            .chain(self.ef.iter().map(CandidateRef::EdgeFace))
            .chain(self.vv.iter().map(CandidateRef::VertexVertex))
    }

    /// Number of candidates that can be checked by CCD (edge-vertex, edge-edge, face-vertex).
    pub fn continuous_len(&self) -> usize {
        self.ev.len() + self.ee.len() + self.fv.len()
    }

    /// The CCD query at index `i` of the continuous prefix.
    pub fn continuous_at(&self, i: usize) -> CandidateResult<&dyn ContinuousCandidate> {
        let out_of_range = CandidateError::OutOfRange {
            index: i,
            len: self.continuous_len(),
        };
        if i >= self.continuous_len() {
            return Err(out_of_range);
        }
        self.at(i)?.as_continuous().ok_or(out_of_range)
    }

    /// Sort each kind by its ordering and drop duplicates.
    ///
    /// Swapped vertex-vertex and edge-edge pairs count as duplicates.
    pub fn sort_and_dedup(&mut self) {
        self.ev.sort_unstable();
        self.ev.dedup();
        self.ee.sort_unstable();
        self.ee.dedup();
        self.fv.sort_unstable();
        self.fv.dedup();
        self.ef.sort_unstable();
        self.ef.dedup();
        self.vv.sort_unstable();
        self.vv.dedup();
    }
}
