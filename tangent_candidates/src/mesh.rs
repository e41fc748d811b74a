// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated mesh input for the broad phase.

use nalgebra::DMatrix;
use tangent_index::Aabb;

use crate::error::{CandidateError, CandidateResult};
use crate::mapper::{Dimension, EntityMapper};

/// Vertex positions at one or two time samples plus edge and face topology.
///
/// Construction checks that the vertex matrices agree in shape, have 2 or 3 columns,
/// hold only finite coordinates, and that every edge and face refers to an existing
/// vertex row. 2D meshes carry no faces.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionMesh {
    vertices_t0: DMatrix<f64>,
    vertices_t1: Option<DMatrix<f64>>,
    edges: Vec<[usize; 2]>,
    faces: Vec<[usize; 3]>,
    dimension: Dimension,
}

impl CollisionMesh {
    /// A mesh at rest, for static (intersection or proximity) queries.
    pub fn new_static(
        vertices: DMatrix<f64>,
        edges: Vec<[usize; 2]>,
        faces: Vec<[usize; 3]>,
    ) -> CandidateResult<Self> {
        let dimension = validate_vertices("vertices", &vertices)?;
        validate_topology(vertices.nrows(), dimension, &edges, &faces)?;
        Ok(Self {
            vertices_t0: vertices,
            vertices_t1: None,
            edges,
            faces,
            dimension,
        })
    }

    /// A mesh moving linearly from `vertices_t0` to `vertices_t1` over one step.
    pub fn new_swept(
        vertices_t0: DMatrix<f64>,
        vertices_t1: DMatrix<f64>,
        edges: Vec<[usize; 2]>,
        faces: Vec<[usize; 3]>,
    ) -> CandidateResult<Self> {
        let dimension = validate_vertices("vertices at t0", &vertices_t0)?;
        validate_vertices("vertices at t1", &vertices_t1)?;
        if vertices_t0.shape() != vertices_t1.shape() {
            return Err(CandidateError::InvalidMesh(format!(
                "vertex matrices differ in shape: {:?} at t0, {:?} at t1",
                vertices_t0.shape(),
                vertices_t1.shape()
            )));
        }
        validate_topology(vertices_t0.nrows(), dimension, &edges, &faces)?;
        Ok(Self {
            vertices_t0,
            vertices_t1: Some(vertices_t1),
            edges,
            faces,
            dimension,
        })
    }

    /// Positions at the start of the step.
    pub fn vertices_t0(&self) -> &DMatrix<f64> {
        &self.vertices_t0
    }

    /// Positions at the end of the step; the start positions for a static mesh.
    pub fn vertices_t1(&self) -> &DMatrix<f64> {
        self.vertices_t1.as_ref().unwrap_or(&self.vertices_t0)
    }

    /// Whether the mesh carries two time samples.
    pub fn is_swept(&self) -> bool {
        self.vertices_t1.is_some()
    }

    /// Edge table.
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Face table (empty in 2D).
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Mesh dimension, inferred from the vertex column count.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Number of vertex rows.
    pub fn num_vertices(&self) -> usize {
        self.vertices_t0.nrows()
    }

    /// Flat index space of this mesh's boxes.
    pub fn mapper(&self) -> EntityMapper {
        EntityMapper::new(
            self.num_vertices(),
            self.edges.len(),
            self.faces.len(),
            self.dimension,
        )
    }

    /// One box per vertex, edge and face (in that order) at the given positions.
    pub(crate) fn boxes(&self, vertices: &DMatrix<f64>) -> Vec<Aabb<f64>> {
        let point = |i: usize| -> [f64; 3] {
            let mut p = [0.0; 3];
            for (c, x) in vertices.row(i).iter().enumerate() {
                p[c] = *x;
            }
            p
        };
        let mut out = Vec::with_capacity(self.mapper().total());
        out.extend((0..vertices.nrows()).map(|i| Aabb::from_point(point(i))));
        out.extend(self.edges.iter().map(|&[a, b]| {
            let mut bb = Aabb::from_point(point(a));
            bb.expand_to_point(point(b));
            bb
        }));
        out.extend(self.faces.iter().map(|&[a, b, c]| {
            let mut bb = Aabb::from_point(point(a));
            bb.expand_to_point(point(b));
            bb.expand_to_point(point(c));
            bb
        }));
        out
    }
}

fn validate_vertices(what: &str, vertices: &DMatrix<f64>) -> CandidateResult<Dimension> {
    let dimension = Dimension::from_columns(vertices.ncols()).ok_or_else(|| {
        CandidateError::InvalidMesh(format!(
            "{what} must have 2 or 3 columns, got {}",
            vertices.ncols()
        ))
    })?;
    if let Some(k) = vertices.iter().position(|x| !x.is_finite()) {
        // Column-major storage.
        let (row, col) = (k % vertices.nrows(), k / vertices.nrows());
        return Err(CandidateError::InvalidMesh(format!(
            "{what} has a non-finite coordinate at row {row}, column {col}"
        )));
    }
    Ok(dimension)
}

fn validate_topology(
    num_vertices: usize,
    dimension: Dimension,
    edges: &[[usize; 2]],
    faces: &[[usize; 3]],
) -> CandidateResult<()> {
    if dimension == Dimension::Two && !faces.is_empty() {
        return Err(CandidateError::InvalidMesh(format!(
            "2D meshes have no faces, got {}",
            faces.len()
        )));
    }
    for (e, edge) in edges.iter().enumerate() {
        if let Some(v) = edge.iter().find(|&&v| v >= num_vertices) {
            return Err(CandidateError::InvalidMesh(format!(
                "edge {e} refers to vertex {v}, but the mesh has {num_vertices} vertices"
            )));
        }
    }
    for (f, face) in faces.iter().enumerate() {
        if let Some(v) = face.iter().find(|&&v| v >= num_vertices) {
            return Err(CandidateError::InvalidMesh(format!(
                "face {f} refers to vertex {v}, but the mesh has {num_vertices} vertices"
            )));
        }
    }
    Ok(())
}
