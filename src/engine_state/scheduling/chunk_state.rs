use std::fmt;

/// Lifecycle state of one chunk coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// Not visible and not meshed. May still hold a halo grid.
    Unrequested,
    /// Visible, but its grid or mesh is not built yet.
    PendingBuild,
    /// Visible and meshed; part of the draw list.
    Ready,
    /// Meshed but no longer visible; released by the next update.
    Evictable,
}

impl ChunkState {
    /// Derives the state from whether a mesh exists and whether the chunk is visible.
    pub fn derive(has_mesh: bool, visible: bool) -> Self {
        match (has_mesh, visible) {
            (true, true) => ChunkState::Ready,
            (true, false) => ChunkState::Evictable,
            (false, true) => ChunkState::PendingBuild,
            (false, false) => ChunkState::Unrequested,
        }
    }
}

impl fmt::Display for ChunkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChunkState::Unrequested => "unrequested",
            ChunkState::PendingBuild => "pending build",
            ChunkState::Ready => "ready",
            ChunkState::Evictable => "evictable",
        };
        f.write_str(name)
    }
}
