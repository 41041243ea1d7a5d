mod chunk;

pub(crate) use self::chunk::ChunkStorage;

use {
    crate::{
        error::WorldError,
        registry::{ComponentId, ComponentRegistry},
    },
    std::mem::size_of,
};


/// All entities sharing one exact component signature.
///
/// `components` is the canonical, ascending-sorted signature; archetype
/// equality is signature equality and is checked by the `World`'s
/// archetype index before an `Archetype` is ever constructed. An
/// archetype's id is simply its index in `World`'s archetype vector, its
/// insertion order, and is stable for the `World`'s lifetime.
pub(crate) struct Archetype {
    components: Box<[ComponentId]>,
    chunks: Vec<ChunkStorage>,
    chunk_capacity: usize,
}

impl Archetype {
    /// `components` must already be canonicalized (sorted ascending, no
    /// duplicates) by the caller. Allocates one initial chunk.
    pub fn new(
        components: Box<[ComponentId]>,
        registry: &ComponentRegistry,
        chunk_capacity: usize,
    ) -> Result<Self, WorldError> {
        // Guard the layout math against overflow before committing to an
        // allocation: the combined per-row size (fields plus the id slot),
        // times the chunk capacity, must fit in `usize`.
        let row_stride = components
            .iter()
            .map(|&id| registry.entity_stride(id))
            .try_fold(size_of::<u32>(), |acc, stride| acc.checked_add(stride))
            .ok_or(WorldError::ComponentTooLarge)?;

        row_stride
            .checked_mul(chunk_capacity)
            .ok_or(WorldError::ComponentTooLarge)?;

        let mut archetype = Archetype {
            components,
            chunks: Vec::new(),
            chunk_capacity,
        };
        archetype.alloc_chunk(registry);
        Ok(archetype)
    }

    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    /// Returns the archetype-local slot of `id` within this archetype's
    /// signature, or `None` if this archetype does not carry it.
    pub fn has_component(&self, id: ComponentId) -> Option<usize> {
        self.components.iter().position(|&c| c == id)
    }

    pub fn chunks(&self) -> &[ChunkStorage] {
        &self.chunks
    }

    fn alloc_chunk(&mut self, registry: &ComponentRegistry) {
        log::trace!(
            "allocating chunk {} ({} component(s), capacity {})",
            self.chunks.len(),
            self.components.len(),
            self.chunk_capacity,
        );
        self.chunks
            .push(ChunkStorage::new(&self.components, registry, self.chunk_capacity));
    }

    /// Places `entity_id` in the first chunk with spare capacity (deletions
    /// free rows in arbitrary chunks, so reuse requires a scan rather than
    /// a cursor), allocating a new chunk only if every existing one is
    /// full. Returns `(chunk_index, row)`.
    pub fn append(&mut self, entity_id: u32, registry: &ComponentRegistry) -> (usize, usize) {
        for (chunk_index, chunk) in self.chunks.iter_mut().enumerate() {
            if !chunk.is_full() {
                let row = chunk.push_id(entity_id);
                return (chunk_index, row);
            }
        }

        self.alloc_chunk(registry);
        let chunk_index = self.chunks.len() - 1;
        let row = self.chunks[chunk_index].push_id(entity_id);
        (chunk_index, row)
    }

    /// Swap-pop removal of the row at `(chunk_index, row)`. Intra-chunk
    /// only: a deletion never pulls a row back from a later chunk, so
    /// chunks may end up partially filled after many deletions; density
    /// recovery is left to future work, matching the source engine. Returns
    /// the id of the entity that moved into `row`, if the removed row
    /// wasn't already the chunk's last live row.
    pub fn swap_pop(&mut self, chunk_index: usize, row: usize, registry: &ComponentRegistry) -> Option<u32> {
        let chunk = &mut self.chunks[chunk_index];
        let last = chunk.len() - 1;

        if row == last {
            chunk.dec_len();
            return None;
        }

        let moved = chunk.copy_row(&self.components, registry, last, row);
        chunk.dec_len();
        Some(moved)
    }
}
