//! Chunk lifecycle: the odd-sized ring of loaded chunks around the player

use ahash::AHashMap;
use glam::{IVec2, Vec2};

use super::chunk::Chunk;

/// Center of the chunk containing `pos`
pub fn to_chunk_center(pos: Vec2, chunk_size: i32) -> IVec2 {
    let size = chunk_size.max(1);
    let snap = |coord: f32| (coord / size as f32).floor() as i32 * size + size / 2;
    IVec2::new(snap(pos.x), snap(pos.y))
}

/// Chunks generated and dropped by one reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub loaded: usize,
    pub unloaded: usize,
}

/// Keeps exactly the ring of chunks around the player loaded
#[derive(Debug)]
pub struct ChunkManager {
    chunks: AHashMap<IVec2, Chunk>,
    chunk_size: i32,
    /// Side of the ring, always odd
    ring_size: i32,
    /// Chunk the ring was last built around
    current: Option<IVec2>,
}

impl ChunkManager {
    pub fn new(chunk_size: i32, ring_size: i32) -> Self {
        let ring_size = ring_size.max(1);
        Self {
            chunks: AHashMap::new(),
            chunk_size: chunk_size.max(1),
            ring_size: if ring_size % 2 == 0 { ring_size + 1 } else { ring_size },
            current: None,
        }
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    pub fn ring_size(&self) -> i32 {
        self.ring_size
    }

    /// Chunk the player stood in at the last update
    pub fn current_chunk(&self) -> Option<IVec2> {
        self.current
    }

    /// Centers of every chunk the ring around `player` needs
    pub fn needed(&self, player: Vec2) -> Vec<IVec2> {
        let center = to_chunk_center(player, self.chunk_size);
        let half = self.ring_size / 2;
        let mut needed = Vec::with_capacity((self.ring_size * self.ring_size) as usize);
        for i in -half..=half {
            for j in -half..=half {
                needed.push(center + IVec2::new(i, j) * self.chunk_size);
            }
        }
        needed
    }

    /// Rebuild the ring if the player entered another chunk
    ///
    /// Returns `None` when the player chunk did not change.
    pub fn update(
        &mut self,
        player: Vec2,
        generate: impl FnMut(IVec2) -> Chunk,
    ) -> Option<ReconcileStats> {
        let chunk = to_chunk_center(player, self.chunk_size);
        if self.current == Some(chunk) {
            return None;
        }
        Some(self.reconcile(player, generate))
    }

    /// Unload chunks outside the ring and generate the missing ones
    pub fn reconcile(
        &mut self,
        player: Vec2,
        mut generate: impl FnMut(IVec2) -> Chunk,
    ) -> ReconcileStats {
        let needed = self.needed(player);
        let before = self.chunks.len();
        self.chunks.retain(|center, _| needed.contains(center));
        let unloaded = before - self.chunks.len();

        let mut loaded = 0;
        for center in needed {
            if !self.chunks.contains_key(&center) {
                self.chunks.insert(center, generate(center));
                loaded += 1;
            }
        }

        self.current = Some(to_chunk_center(player, self.chunk_size));
        if loaded > 0 || unloaded > 0 {
            log::debug!(
                "Chunk ring around {:?}: {} loaded, {} unloaded, {} resident",
                self.current,
                loaded,
                unloaded,
                self.chunks.len()
            );
        }
        ReconcileStats { loaded, unloaded }
    }

    pub fn get(&self, center: IVec2) -> Option<&Chunk> {
        self.chunks.get(&center)
    }

    pub fn contains(&self, center: IVec2) -> bool {
        self.chunks.contains_key(&center)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
