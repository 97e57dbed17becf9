//! Incrementally edited tile mesh.
//!
//! One quad per tile: vertex block `[4i, 4i+4)`, UV block `[4i, 4i+4)` and
//! triangle block `[6i, 6i+6)` all belong to the tile at `TileSet` index `i`.
//! Removing a quad deletes its three blocks and shifts every triangle index
//! that pointed past the removed vertices down by four.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::config::DEFAULT_TILE_SCALE;
use crate::error::TileMeshError;
use crate::tile::same_cell;

pub const VERTS_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

/// UVs of the four quad corners, in vertex order.
const QUAD_UVS: [[f32; 2]; 4] = [[1.0, 1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];

/// Something that can display the tile mesh buffers.
pub trait MeshSink {
    fn replace_buffers(&mut self, positions: &[[f32; 3]], indices: &[u32], uvs: &[[f32; 2]]);
    fn clear(&mut self);
}

impl MeshSink for Mesh {
    fn replace_buffers(&mut self, positions: &[[f32; 3]], indices: &[u32], uvs: &[[f32; 2]]) {
        // Tiles are flat, so every normal points up.
        let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
        self.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions.to_vec());
        self.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        self.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs.to_vec());
        self.insert_indices(Indices::U32(indices.to_vec()));
    }

    fn clear(&mut self) {
        self.remove_attribute(Mesh::ATTRIBUTE_POSITION);
        self.remove_attribute(Mesh::ATTRIBUTE_NORMAL);
        self.remove_attribute(Mesh::ATTRIBUTE_UV_0);
        self.remove_indices();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileMeshBuilder {
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
    uvs: Vec<[f32; 2]>,
    half_extent: f32,
}

impl Default for TileMeshBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SCALE / 2.0)
    }
}

impl TileMeshBuilder {
    pub fn new(half_extent: f32) -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
            uvs: Vec::new(),
            half_extent,
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn quad_count(&self) -> usize {
        self.positions.len() / VERTS_PER_QUAD
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Half-extent used for quads drawn from now on. Existing quads keep
    /// their size until the mesh is rebuilt.
    pub fn set_half_extent(&mut self, half_extent: f32) {
        self.half_extent = half_extent;
    }

    /// Append a quad centred on `position`, lifted by `y_offset`.
    ///
    /// Room for the whole quad is reserved before anything is written, so
    /// on failure the buffers are unchanged.
    pub fn add_quad(&mut self, position: Vec3, y_offset: f32) -> Result<(), TileMeshError> {
        self.positions.try_reserve(VERTS_PER_QUAD)?;
        self.uvs.try_reserve(VERTS_PER_QUAD)?;
        self.indices.try_reserve(INDICES_PER_QUAD)?;

        let h = self.half_extent;
        let y = position.y + y_offset;
        let k = self.positions.len() as u32;

        self.positions.extend_from_slice(&[
            [position.x + h, y, position.z + h],
            [position.x + h, y, position.z - h],
            [position.x - h, y, position.z + h],
            [position.x - h, y, position.z - h],
        ]);
        // Second triangle is wound against the first, across the shared
        // 1-2 diagonal.
        self.indices
            .extend_from_slice(&[k, k + 1, k + 2, k + 3, k + 2, k + 1]);
        self.uvs.extend_from_slice(&QUAD_UVS);
        Ok(())
    }

    /// Vertex index of the first quad drawn for the cell at `position`.
    fn find_quad(&self, position: Vec3) -> Option<usize> {
        let h = self.half_extent;
        self.positions
            .iter()
            .step_by(VERTS_PER_QUAD)
            .position(|v| same_cell(position, Vec3::new(v[0] - h, 0.0, v[2] - h)))
            .map(|quad| quad * VERTS_PER_QUAD)
    }

    /// Remove the quad drawn for the cell at `position`. Returns false (and
    /// changes nothing) when no quad matches.
    ///
    /// Matching reprojects each quad's first vertex by the current
    /// half-extent, so quads drawn before a `set_half_extent` call are only
    /// found again after a rebuild.
    pub fn remove_quad(&mut self, position: Vec3) -> bool {
        let Some(k) = self.find_quad(position) else {
            return false;
        };
        let vert_range = k..k + VERTS_PER_QUAD;
        let tri_start = k / VERTS_PER_QUAD * INDICES_PER_QUAD;
        let tri_range = tri_start..tri_start + INDICES_PER_QUAD;
        let shift_from = (k + VERTS_PER_QUAD) as u32;

        let positions: Vec<[f32; 3]> = self
            .positions
            .iter()
            .enumerate()
            .filter(|(i, _)| !vert_range.contains(i))
            .map(|(_, v)| *v)
            .collect();
        let uvs: Vec<[f32; 2]> = self
            .uvs
            .iter()
            .enumerate()
            .filter(|(i, _)| !vert_range.contains(i))
            .map(|(_, uv)| *uv)
            .collect();
        let indices: Vec<u32> = self
            .indices
            .iter()
            .enumerate()
            .filter(|(i, _)| !tri_range.contains(i))
            .map(|(_, &idx)| {
                if idx >= shift_from {
                    idx - VERTS_PER_QUAD as u32
                } else {
                    idx
                }
            })
            .collect();

        self.positions = positions;
        self.uvs = uvs;
        self.indices = indices;
        true
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.indices.clear();
        self.uvs.clear();
    }

    /// Push the current buffers to a display sink.
    pub fn write_to(&self, sink: &mut impl MeshSink) {
        if self.is_empty() {
            sink.clear();
        } else {
            sink.replace_buffers(&self.positions, &self.indices, &self.uvs);
        }
    }

    /// A fresh mesh asset holding the current buffers. Kept in the main world
    /// as well so it can be edited in place later.
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        );
        mesh.replace_buffers(&self.positions, &self.indices, &self.uvs);
        mesh
    }
}
