//! Ordered set of painted tiles.
//!
//! Insertion order matters: the tile at index `i` owns quad block `i` of the
//! tile mesh, so removal must keep the relative order of the remaining tiles.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tile::{same_cell, Tile};

/// Backing storage for a `TileSet`.
///
/// The host may persist tiles in its own object model; the set only needs
/// these operations from it.
pub trait TileStore {
    fn all(&self) -> &[Tile];
    fn push(&mut self, tile: Tile);
    /// Delete the tile at `index`, shifting later tiles down by one.
    fn remove_index(&mut self, index: usize);
    /// Drop the last tile.
    fn truncate_last(&mut self);
    fn clear(&mut self);
}

impl TileStore for Vec<Tile> {
    fn all(&self) -> &[Tile] {
        self
    }

    fn push(&mut self, tile: Tile) {
        Vec::push(self, tile);
    }

    fn remove_index(&mut self, index: usize) {
        self.remove(index);
    }

    fn truncate_last(&mut self) {
        self.pop();
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Serialized as the plain list of tile positions, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileSet<S = Vec<Tile>> {
    store: S,
}

impl TileSet<Vec<Tile>> {
    pub fn new() -> Self {
        Self { store: Vec::new() }
    }
}

impl<S: TileStore> TileSet<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.all().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Tile> {
        self.store.all().get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        self.store.all().iter().copied()
    }

    pub fn as_slice(&self) -> &[Tile] {
        self.store.all()
    }

    /// True if a stored tile sits in the same cell as `position`.
    pub fn contains(&self, position: Vec3) -> bool {
        self.store.all().iter().any(|t| same_cell(*t, position))
    }

    /// Index of the first tile in the same cell as `position`.
    pub fn index_of(&self, position: Vec3) -> Option<usize> {
        self.store.all().iter().position(|t| same_cell(*t, position))
    }

    /// Append without a duplicate check; callers check `contains` first.
    pub fn append(&mut self, tile: Tile) {
        self.store.push(tile);
    }

    /// Remove the tile in the same cell as `position`, returning its index.
    ///
    /// The last tile is truncated; any other is deleted in place with later
    /// tiles shifting down, never swapped with the last one.
    pub fn remove_at(&mut self, position: Vec3) -> Option<usize> {
        let index = self.index_of(position)?;
        if index + 1 == self.len() {
            self.store.truncate_last();
        } else {
            self.store.remove_index(index);
        }
        Some(index)
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }
}
