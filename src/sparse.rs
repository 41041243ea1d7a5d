/// One sparse-index entry: the archetype, chunk, and row currently owning
/// an entity id. Entries for ids that were never inserted hold whatever
/// default (garbage, by contract) values occupy that slot.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SparseEntry {
    pub archetype: u32,
    pub chunk: u32,
    pub row: u32,
}

/// A chunked sparse array mapping entity id to `(archetype, chunk, row)` in
/// O(1): `sub = id / chunk_size`, `slot = id % chunk_size`.
pub(crate) struct SparseIndex {
    chunk_size: usize,
    chunks: Vec<Box<[SparseEntry]>>,
}

impl SparseIndex {
    pub fn new(chunk_size: usize, initial_chunks: usize) -> Self {
        let mut index = SparseIndex {
            chunk_size,
            chunks: Vec::new(),
        };
        for _ in 0..initial_chunks {
            index.push_chunk();
        }
        index
    }

    fn push_chunk(&mut self) {
        self.chunks
            .push(vec![SparseEntry::default(); self.chunk_size].into_boxed_slice());
    }

    /// Grows the sub-array vector, doubling, until `entity_id` is
    /// addressable. The source engine this crate is modeled on grows by
    /// one sub-array at a time on overflow; doubling is the
    /// correctness-preserving alternative its own design notes call out.
    pub fn ensure_capacity(&mut self, entity_id: u32) {
        let needed = entity_id as usize / self.chunk_size + 1;
        if needed <= self.chunks.len() {
            return;
        }

        let mut target = self.chunks.len().max(1);
        while target < needed {
            target *= 2;
        }

        log::debug!("sparse index growing from {} to {} sub-array(s)", self.chunks.len(), target);

        while self.chunks.len() < target {
            self.push_chunk();
        }
    }

    fn location(&self, entity_id: u32) -> (usize, usize) {
        (entity_id as usize / self.chunk_size, entity_id as usize % self.chunk_size)
    }

    pub fn set(&mut self, entity_id: u32, archetype: usize, chunk: usize, row: usize) {
        let (sub, slot) = self.location(entity_id);
        self.chunks[sub][slot] = SparseEntry {
            archetype: archetype as u32,
            chunk: chunk as u32,
            row: row as u32,
        };
    }

    /// Patches just the row of an already-indexed entity, used when a
    /// swap-pop moves an entity within the same chunk; its archetype and
    /// chunk never change.
    pub fn set_row(&mut self, entity_id: u32, row: usize) {
        let (sub, slot) = self.location(entity_id);
        self.chunks[sub][slot].row = row as u32;
    }

    /// Returns the triple for `entity_id`, or `None` if it is beyond the
    /// currently allocated sparse range. Does not validate liveness.
    pub fn get(&self, entity_id: u32) -> Option<SparseEntry> {
        let (sub, slot) = self.location(entity_id);
        self.chunks.get(sub).map(|c| c[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_roundtrip() {
        let mut index = SparseIndex::new(4, 1);
        index.set(1, 2, 3, 0);
        let entry = index.get(1).unwrap();
        assert_eq!((entry.archetype, entry.chunk, entry.row), (2, 3, 0));
    }

    #[test]
    fn out_of_range_id_returns_none() {
        let index = SparseIndex::new(4, 1);
        assert!(index.get(100).is_none());
    }

    #[test]
    fn ensure_capacity_grows_to_cover_id() {
        let mut index = SparseIndex::new(4, 1);
        index.ensure_capacity(20);
        assert!(index.get(20).is_some());
    }

    #[test]
    fn set_row_preserves_archetype_and_chunk() {
        let mut index = SparseIndex::new(4, 1);
        index.set(0, 5, 6, 7);
        index.set_row(0, 1);
        let entry = index.get(0).unwrap();
        assert_eq!((entry.archetype, entry.chunk, entry.row), (5, 6, 1));
    }
}
