//! Consistency checks between the tile set and its mesh.
//!
//! The mesh must hold exactly one quad per tile, in tile order, and every
//! triangle must stay inside its own quad block. A broken correspondence means
//! erasing would delete the wrong quad, so violations are logged loudly.

use bevy::prelude::*;

use crate::mesh_builder::{INDICES_PER_QUAD, VERTS_PER_QUAD};
use crate::tile::same_cell;
use crate::tile_grid::TileGrid;

#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Vertex buffer length is not four per tile.
    VertexCount { tiles: usize, vertices: usize },
    /// Triangle buffer length is not six per tile.
    IndexCount { tiles: usize, indices: usize },
    UvCount { vertices: usize, uvs: usize },
    /// Triangle index pointing past the vertex buffer.
    IndexOutOfRange { slot: usize, index: u32, vertices: usize },
    /// Triangle in block `quad` referencing a vertex of another quad.
    ForeignVertex { quad: usize, index: u32 },
    /// Quad `quad` is not drawn over the tile at the same index.
    MisplacedQuad { quad: usize, tile: Vec3 },
    /// Two tiles share a cell.
    DuplicateTile { first: usize, second: usize },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VertexCount { tiles, vertices } => {
                write!(f, "{vertices} vertices for {tiles} tiles")
            }
            Self::IndexCount { tiles, indices } => {
                write!(f, "{indices} triangle indices for {tiles} tiles")
            }
            Self::UvCount { vertices, uvs } => write!(f, "{uvs} UVs for {vertices} vertices"),
            Self::IndexOutOfRange {
                slot,
                index,
                vertices,
            } => write!(
                f,
                "triangle index {index} at slot {slot} exceeds {vertices} vertices"
            ),
            Self::ForeignVertex { quad, index } => {
                write!(f, "quad {quad} references vertex {index} of another quad")
            }
            Self::MisplacedQuad { quad, tile } => {
                write!(f, "quad {quad} is not drawn over tile {tile}")
            }
            Self::DuplicateTile { first, second } => {
                write!(f, "tiles {first} and {second} share a cell")
            }
        }
    }
}

/// Every way `grid`'s mesh disagrees with its tiles. Empty when consistent.
pub fn check_tile_mesh_invariants(grid: &TileGrid) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let tiles = grid.tiles().as_slice();
    let mesh = grid.mesh();
    let vertices = mesh.positions().len();

    if vertices != tiles.len() * VERTS_PER_QUAD {
        violations.push(InvariantViolation::VertexCount {
            tiles: tiles.len(),
            vertices,
        });
    }
    if mesh.indices().len() != tiles.len() * INDICES_PER_QUAD {
        violations.push(InvariantViolation::IndexCount {
            tiles: tiles.len(),
            indices: mesh.indices().len(),
        });
    }
    if mesh.uvs().len() != vertices {
        violations.push(InvariantViolation::UvCount {
            vertices,
            uvs: mesh.uvs().len(),
        });
    }

    for (slot, &index) in mesh.indices().iter().enumerate() {
        if index as usize >= vertices {
            violations.push(InvariantViolation::IndexOutOfRange {
                slot,
                index,
                vertices,
            });
            continue;
        }
        let quad = slot / INDICES_PER_QUAD;
        if index as usize / VERTS_PER_QUAD != quad {
            violations.push(InvariantViolation::ForeignVertex { quad, index });
        }
    }

    let h = mesh.half_extent();
    for (quad, (tile, corner)) in tiles
        .iter()
        .zip(mesh.positions().iter().step_by(VERTS_PER_QUAD))
        .enumerate()
    {
        let anchor = Vec3::new(corner[0] - h, 0.0, corner[2] - h);
        if !same_cell(*tile, anchor) {
            violations.push(InvariantViolation::MisplacedQuad { quad, tile: *tile });
        }
    }

    for (first, a) in tiles.iter().enumerate() {
        if let Some(offset) = tiles[first + 1..].iter().position(|b| same_cell(*a, *b)) {
            violations.push(InvariantViolation::DuplicateTile {
                first,
                second: first + 1 + offset,
            });
        }
    }

    violations
}

/// Number of violations found by the last check. Used by tests.
#[derive(Resource, Debug, Default)]
pub struct TileMeshViolations {
    pub last_count: usize,
}

/// Re-check the grid after it changed and warn about any violation.
pub fn validate_tile_mesh(grid: Res<TileGrid>, mut violations: ResMut<TileMeshViolations>) {
    if !grid.is_changed() {
        return;
    }
    let found = check_tile_mesh_invariants(&grid);
    for violation in &found {
        warn!("Invariant violation: tile mesh {violation}");
    }
    violations.last_count = found.len();
}
