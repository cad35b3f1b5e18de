// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Human-readable and JSON mesh reports.

use std::fmt;
use std::path::Path;

use manifold_lite_topology::{Mesh, MAX_LOD_LEVELS};
use serde::Serialize;

/// Counts and classification of one processed mesh.
#[derive(Debug, Clone, Serialize)]
pub struct MeshSummary {
    pub name: String,
    pub path: String,
    /// `None` until the mesh has been classified
    pub manifold: Option<bool>,
    pub vertices: usize,
    pub normals: usize,
    pub colors: usize,
    pub uvs: usize,
    pub edges: usize,
    pub boundary_edges: usize,
    /// Face count of every level-of-detail slot
    pub faces: Vec<usize>,
}

impl MeshSummary {
    pub fn new(mesh: &Mesh, path: &Path) -> Self {
        let table = mesh.edge_table();
        Self {
            name: mesh.name().to_string(),
            path: path.display().to_string(),
            manifold: mesh.is_manifold(),
            vertices: mesh.vertex_count(),
            normals: mesh.normals().len(),
            colors: mesh.colors().len(),
            uvs: mesh.uvs().len(),
            edges: table.map_or(0, |t| t.len()),
            boundary_edges: table.map_or(0, |t| t.boundary_edge_count()),
            faces: (0..MAX_LOD_LEVELS).map(|l| mesh.faces(l).len()).collect(),
        }
    }
}

impl fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*******************")?;
        writeln!(f, "* Mesh debug info *")?;
        writeln!(f, "*******************")?;
        writeln!(f, "Mesh name: {}", self.name)?;
        writeln!(f, "Mesh path: {}", self.path)?;
        let manifold = match self.manifold {
            Some(true) => "Yes",
            Some(false) => "No",
            None => "Unknown",
        };
        writeln!(f, "Mesh is manifold: {manifold}")?;
        writeln!(f)?;
        writeln!(f, "Number of vertices: {}", self.vertices)?;
        writeln!(f, "Number of normals: {}", self.normals)?;
        writeln!(f, "Number of colours: {}", self.colors)?;
        writeln!(f, "Number of UV coordinates: {}", self.uvs)?;
        writeln!(f, "Number of edges: {}", self.edges)?;
        writeln!(f, "Number of boundary edges: {}", self.boundary_edges)?;
        let faces: Vec<String> = self.faces.iter().map(usize::to_string).collect();
        writeln!(f, "Number of faces: {}", faces.join(", "))
    }
}

/// Per-corner attributes and half-edges of the first base face.
pub struct FirstFace<'a>(pub &'a Mesh);

impl fmt::Display for FirstFace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mesh = self.0;
        let Some(face) = mesh.base_faces().first() else {
            return writeln!(f, "Mesh has no faces");
        };
        let table = mesh.edge_table();

        writeln!(f, "Data for vertices in first face:")?;
        for corner in 0..3 {
            let (p, n, c, u) = (
                face.vertices[corner],
                face.normals[corner],
                face.colors[corner],
                face.uvs[corner],
            );
            writeln!(f, "Vertex {corner}:")?;
            if let Some(pos) = mesh.positions().get(p as usize) {
                writeln!(f, "--> Position {p}: {:.6}, {:.6}, {:.6}", pos.x, pos.y, pos.z)?;
            }
            if let Some(normal) = mesh.normals().get(n as usize) {
                writeln!(f, "--> Normal {n}: {}, {}, {}", normal.x, normal.y, normal.z)?;
            }
            if let Some(color) = mesh.colors().get(c as usize) {
                writeln!(
                    f,
                    "--> Colour {c}: {}, {}, {}, {}",
                    color.r, color.g, color.b, color.a
                )?;
            }
            if let Some(uv) = mesh.uvs().get(u as usize) {
                writeln!(f, "--> UV coordinates {u}: {:.6}, {:.6}", uv.x, uv.y)?;
            }
            if let Some(table) = table {
                writeln!(f, "--> Seed edge: {}", optional(table.seed_edge(p)))?;
            }
        }

        let Some(table) = table else {
            return Ok(());
        };
        writeln!(f)?;
        writeln!(f, "Data for edges in first face:")?;
        for (i, e) in table.face_edges(0).into_iter().enumerate() {
            let Some(edge) = table.edge(e) else {
                continue;
            };
            writeln!(f, "Edge {i}:")?;
            writeln!(f, "--> From vertex {} to {}", edge.v1, edge.v2)?;
            writeln!(f, "--> Next edge: {}", edge.next)?;
            writeln!(f, "--> Face: {}", edge.face)?;
            writeln!(f, "--> Other half: {}", optional(edge.other_half))?;
            let other_face = table.faces_sharing(e).and_then(|(_, across)| across);
            writeln!(f, "--> Other face: {}", optional(other_face))?;
        }
        Ok(())
    }
}

fn optional(value: Option<u32>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}
