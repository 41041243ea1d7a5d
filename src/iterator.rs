use {crate::registry::ComponentId, std::ptr::NonNull};

/// One requested component's field-base addresses within a single matched
/// chunk. `bases[field_index]` is the address of that field's column base
/// for the chunk; rows `[0, len)` of it (`len` from the owning
/// [`ChunkColumns`]) may be read or written until the next mutating
/// `World` call.
pub struct ComponentColumn {
    pub(crate) bases: Vec<NonNull<u8>>,
}

impl ComponentColumn {
    pub fn field_base(&self, field_index: usize) -> NonNull<u8> {
        self.bases[field_index]
    }

    pub fn field_count(&self) -> usize {
        self.bases.len()
    }
}

/// One matched chunk's record: one [`ComponentColumn`] per requested
/// component, in request order, plus the chunk's current row count.
pub struct ChunkColumns {
    pub(crate) columns: Vec<ComponentColumn>,
    pub(crate) len: usize,
}

impl ChunkColumns {
    pub fn component(&self, requested_index: usize) -> &ComponentColumn {
        &self.columns[requested_index]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A snapshot of column bases for every chunk of every archetype whose
/// signature is a superset of the requested components.
///
/// Archetypes are visited in creation order; within an archetype, chunks
/// are visited in chunk-index order. No ordering is guaranteed across
/// archetypes.
///
/// This is a pointer snapshot, not a live view: any subsequent
/// `World::add_entity`, `World::remove_entity`, or archetype/chunk
/// allocation may reallocate the chunks this iterator points into. Do not
/// retain a `WorldIterator` across a mutating `World` call.
pub struct WorldIterator {
    requested: Vec<ComponentId>,
    chunks: Vec<ChunkColumns>,
}

impl WorldIterator {
    pub(crate) fn new(requested: Vec<ComponentId>, chunks: Vec<ChunkColumns>) -> Self {
        WorldIterator { requested, chunks }
    }

    pub fn requested_components(&self) -> &[ComponentId] {
        &self.requested
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, index: usize) -> &ChunkColumns {
        &self.chunks[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChunkColumns> {
        self.chunks.iter()
    }
}

impl<'a> IntoIterator for &'a WorldIterator {
    type Item = &'a ChunkColumns;
    type IntoIter = std::slice::Iter<'a, ChunkColumns>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Releases the iterator's own snapshot buffers. It never touches `World`
/// state, and is provided as an explicit, symmetric counterpart to
/// `World::iterator` for callers that would rather call a function than
/// rely on `Drop` (e.g. across an FFI boundary).
pub fn destroy(_iterator: WorldIterator) {}
