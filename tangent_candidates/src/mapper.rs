// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat box index space of a mesh.
//!
//! The broad phase indexes one box per vertex, then one per edge, then (in 3D) one per
//! face. [`EntityMapper`] translates between that flat space and primitive ids.

use core::ops::Range;

/// Spatial dimension of a mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    /// Planar mesh: vertices and edges only.
    Two,
    /// Volumetric or surface mesh: vertices, edges and triangular faces.
    Three,
}

impl Dimension {
    /// Number of coordinates per vertex.
    pub const fn coordinates(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Dimension for a vertex matrix with `columns` coordinates per row.
    pub const fn from_columns(columns: usize) -> Option<Self> {
        match columns {
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }
}

/// A primitive named by its id within its own table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    /// Vertex row.
    Vertex(usize),
    /// Edge row.
    Edge(usize),
    /// Face row.
    Face(usize),
}

/// Partition of `[0, total)` into vertex, edge and face ranges, in that order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EntityMapper {
    num_vertices: usize,
    num_edges: usize,
    num_faces: usize,
    dimension: Dimension,
}

impl EntityMapper {
    /// Create a mapper. In 2D the face count is forced to zero.
    pub const fn new(
        num_vertices: usize,
        num_edges: usize,
        num_faces: usize,
        dimension: Dimension,
    ) -> Self {
        let num_faces = match dimension {
            Dimension::Two => 0,
            Dimension::Three => num_faces,
        };
        Self {
            num_vertices,
            num_edges,
            num_faces,
            dimension,
        }
    }

    /// Dimension the mapper was built for.
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Number of vertices.
    pub const fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Number of edges.
    pub const fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Number of faces (zero in 2D).
    pub const fn num_faces(&self) -> usize {
        self.num_faces
    }

    /// Size of the flat index space.
    pub const fn total(&self) -> usize {
        self.num_vertices + self.num_edges + self.num_faces
    }

    /// Flat ids of vertices.
    pub const fn vertex_range(&self) -> Range<usize> {
        0..self.num_vertices
    }

    /// Flat ids of edges.
    pub const fn edge_range(&self) -> Range<usize> {
        self.num_vertices..self.num_vertices + self.num_edges
    }

    /// Flat ids of faces; empty in 2D.
    pub const fn face_range(&self) -> Range<usize> {
        let start = self.num_vertices + self.num_edges;
        start..start + self.num_faces
    }

    /// Whether `id` is a vertex box.
    #[inline]
    pub const fn is_vertex(&self, id: usize) -> bool {
        id < self.num_vertices
    }

    /// Whether `id` is an edge box.
    #[inline]
    pub const fn is_edge(&self, id: usize) -> bool {
        id >= self.num_vertices && id < self.num_vertices + self.num_edges
    }

    /// Whether `id` is a face box. Always false in 2D.
    #[inline]
    pub const fn is_face(&self, id: usize) -> bool {
        let start = self.num_vertices + self.num_edges;
        id >= start && id < start + self.num_faces
    }

    /// Edge row of the edge box `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an edge box.
    #[track_caller]
    pub fn to_edge_id(&self, id: usize) -> usize {
        assert!(
            self.is_edge(id),
            "flat id {id} is not an edge (edges occupy {:?})",
            self.edge_range()
        );
        id - self.num_vertices
    }

    /// Face row of the face box `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a face box.
    #[track_caller]
    pub fn to_face_id(&self, id: usize) -> usize {
        assert!(
            self.is_face(id),
            "flat id {id} is not a face (faces occupy {:?})",
            self.face_range()
        );
        id - self.num_vertices - self.num_edges
    }

    /// Flat id of edge row `edge`.
    pub const fn edge_to_id(&self, edge: usize) -> usize {
        self.num_vertices + edge
    }

    /// Flat id of face row `face`.
    pub const fn face_to_id(&self, face: usize) -> usize {
        self.num_vertices + self.num_edges + face
    }

    /// Classify a flat id, or `None` past the end.
    pub fn classify(&self, id: usize) -> Option<Entity> {
        if self.is_vertex(id) {
            Some(Entity::Vertex(id))
        } else if self.is_edge(id) {
            Some(Entity::Edge(id - self.num_vertices))
        } else if self.is_face(id) {
            Some(Entity::Face(id - self.num_vertices - self.num_edges))
        } else {
            None
        }
    }
}
