// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wavefront OBJ dump of a candidate set, for inspecting detections in a viewer.
//!
//! Each candidate kind becomes one object (`o EV`, `o EE`, `o FV`, `o EF`, `o VV`),
//! written only when non-empty. Every candidate emits its own copy of the vertices it
//! touches so that candidates can be selected individually; vertex numbers are global
//! and 1-based.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::DMatrix;
use tracing::debug;

use crate::candidates::Candidates;
use crate::error::CandidateResult;

struct ObjWriter<'a, W> {
    out: W,
    vertices: &'a DMatrix<f64>,
    next: usize,
}

impl<W: Write> ObjWriter<'_, W> {
    /// Emit `v` lines for `ids` and return the 1-based number of the first.
    fn positions(&mut self, ids: &[usize]) -> std::io::Result<usize> {
        let first = self.next;
        for &id in ids {
            write!(self.out, "v")?;
            for x in self.vertices.row(id).iter() {
                write!(self.out, " {x}")?;
            }
            writeln!(self.out)?;
        }
        self.next += ids.len();
        Ok(first)
    }

    fn line(&mut self, a: usize, b: usize) -> std::io::Result<()> {
        writeln!(self.out, "l {a} {b}")
    }

    fn face(&mut self, a: usize, b: usize, c: usize) -> std::io::Result<()> {
        writeln!(self.out, "f {a} {b} {c}")
    }

    fn object(&mut self, name: &str) -> std::io::Result<()> {
        writeln!(self.out, "o {name}")
    }
}

impl Candidates {
    /// Write the set as OBJ to `out`.
    ///
    /// `vertices` holds one row per vertex with 2 or 3 coordinates; `edges` and `faces`
    /// must cover every id the candidates reference.
    pub fn write_obj<W: Write>(
        &self,
        out: W,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
    ) -> CandidateResult<()> {
        let mut w = ObjWriter {
            out,
            vertices,
            next: 1,
        };

        if !self.ev.is_empty() {
            w.object("EV")?;
            for c in &self.ev {
                let i = w.positions(&c.vertex_ids(edges))?;
                w.line(i, i + 1)?;
            }
        }
        if !self.ee.is_empty() {
            w.object("EE")?;
            for c in &self.ee {
                let i = w.positions(&c.vertex_ids(edges))?;
                w.line(i, i + 1)?;
                w.line(i + 2, i + 3)?;
            }
        }
        if !self.fv.is_empty() {
            w.object("FV")?;
            for c in &self.fv {
                let i = w.positions(&c.vertex_ids(faces))?;
                w.face(i, i + 1, i + 2)?;
            }
        }
        if !self.ef.is_empty() {
            w.object("EF")?;
            for c in &self.ef {
                let i = w.positions(&c.vertex_ids(edges, faces))?;
                w.line(i, i + 1)?;
                w.face(i + 2, i + 3, i + 4)?;
            }
        }
        if !self.vv.is_empty() {
            w.object("VV")?;
            for c in &self.vv {
                let i = w.positions(&c.vertex_ids())?;
                w.line(i, i + 1)?;
            }
        }

        w.out.flush()?;
        Ok(())
    }

    /// Write the set as OBJ to the file at `path`, replacing it.
    pub fn export_obj(
        &self,
        path: impl AsRef<Path>,
        vertices: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
    ) -> CandidateResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_obj(BufWriter::new(file), vertices, edges, faces)?;
        debug!(path = %path.display(), candidates = self.len(), "exported candidates");
        Ok(())
    }
}
