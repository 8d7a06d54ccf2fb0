//! Bridge to an external scene graph
//!
//! The game never draws. A host supplies a `SceneGraph` that can build a convex
//! mesh from eight wedge corners; `SceneSync` keeps it in step with the session,
//! touching only cells that changed since the last sync.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::sim::{CellPos, Color, GameState, cell_corners, scene_rotation};

/// Mesh container owned by the rendering host
pub trait SceneGraph {
    /// Opaque mesh handle
    type Handle;

    /// Build a convex mesh through `corners` and add it to the scene
    fn add_wedge(&mut self, corners: [Vec3; 8], color: Color) -> Self::Handle;

    /// Remove a mesh previously returned by `add_wedge`
    fn remove(&mut self, handle: Self::Handle);

    /// Z-rotation applied to all wedge meshes
    fn set_rotation(&mut self, angle: f32);
}

/// Counts from one sync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub added: usize,
    pub removed: usize,
}

/// Tracks which meshes the scene holds for which cells
#[derive(Debug)]
pub struct SceneSync<H> {
    meshes: BTreeMap<CellPos, (Color, H)>,
    base_rotation: Option<u32>,
}

impl<H> Default for SceneSync<H> {
    fn default() -> Self {
        Self {
            meshes: BTreeMap::new(),
            base_rotation: None,
        }
    }
}

impl<H> SceneSync<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes currently in the scene
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Every visible cell: settled cells plus the falling piece.
    /// Settled cells win where an unchecked shift left the piece overlapping them.
    fn desired(state: &GameState) -> BTreeMap<CellPos, Color> {
        let mut cells: BTreeMap<CellPos, Color> = state
            .board
            .occupied_cells()
            .map(|(line, segment, cell)| ((line, segment), cell.color))
            .collect();
        if let Some(piece) = &state.piece {
            for pos in piece.cells(state.config.segment_count) {
                cells.entry(pos).or_insert(piece.color);
            }
        }
        cells
    }

    fn sync_rotation<S: SceneGraph<Handle = H>>(&mut self, state: &GameState, scene: &mut S) {
        if self.base_rotation != Some(state.base_rotation) {
            scene.set_rotation(scene_rotation(&state.config, state.base_rotation));
            self.base_rotation = Some(state.base_rotation);
        }
    }

    /// Add and remove only the meshes whose cell changed
    pub fn sync<S: SceneGraph<Handle = H>>(&mut self, state: &GameState, scene: &mut S) -> SyncStats {
        let desired = Self::desired(state);
        let mut stats = SyncStats::default();

        let stale: Vec<CellPos> = self
            .meshes
            .iter()
            .filter(|(pos, (color, _))| desired.get(*pos) != Some(color))
            .map(|(pos, _)| *pos)
            .collect();
        for pos in stale {
            if let Some((_, handle)) = self.meshes.remove(&pos) {
                scene.remove(handle);
                stats.removed += 1;
            }
        }

        for (pos, color) in desired {
            if self.meshes.contains_key(&pos) {
                continue;
            }
            let handle = scene.add_wedge(cell_corners(&state.config, pos.0, pos.1), color);
            self.meshes.insert(pos, (color, handle));
            stats.added += 1;
        }

        self.sync_rotation(state, scene);
        log::debug!("Scene sync: +{} -{}", stats.added, stats.removed);
        stats
    }

    /// Remove everything and regenerate every mesh
    pub fn rebuild<S: SceneGraph<Handle = H>>(&mut self, state: &GameState, scene: &mut S) -> SyncStats {
        let removed = self.clear(scene);
        self.base_rotation = None;
        let stats = self.sync(state, scene);
        SyncStats { removed, ..stats }
    }

    /// Remove every tracked mesh; returns how many were removed
    pub fn clear<S: SceneGraph<Handle = H>>(&mut self, scene: &mut S) -> usize {
        let count = self.meshes.len();
        for (_, (_, handle)) in std::mem::take(&mut self.meshes) {
            scene.remove(handle);
        }
        count
    }
}
