use {
    crate::{
        config::CACHE_LINE_SIZE,
        registry::{ComponentId, ComponentRegistry},
        util::AlignedBuffer,
    },
    std::{mem::size_of, ptr::NonNull},
};

/// One fixed-capacity slab of rows for a single archetype.
///
/// Holds a cache-aligned `ids` array plus, for each of the archetype's own
/// components, one cache-aligned array per field: a true
/// structure-of-arrays layout. Fields of the same component are never
/// interleaved, unlike a packed per-entity row; this is what lets a caller
/// address (and vectorize over) a single scalar field as one contiguous
/// run.
pub(crate) struct ChunkStorage {
    ids: AlignedBuffer,
    /// `columns[local_slot][field_index]`, indexed by the archetype-local
    /// component slot (its position in the archetype's own canonical
    /// component list) rather than by the global `ComponentId`. A chunk
    /// never allocates columns for components outside its archetype, so a
    /// dense, archetype-local index avoids a per-chunk sparse table keyed
    /// by every component the `World` has ever registered.
    columns: Box<[Box<[AlignedBuffer]>]>,
    capacity: usize,
    len: usize,
}

impl ChunkStorage {
    pub fn new(components: &[ComponentId], registry: &ComponentRegistry, capacity: usize) -> Self {
        let ids = AlignedBuffer::new(capacity * size_of::<u32>(), CACHE_LINE_SIZE);

        let columns = components
            .iter()
            .map(|&id| {
                registry
                    .field_sizes(id)
                    .iter()
                    .map(|&field_size| AlignedBuffer::new(capacity * field_size, CACHE_LINE_SIZE))
                    .collect::<Box<[_]>>()
            })
            .collect::<Box<[_]>>();

        ChunkStorage {
            ids,
            columns,
            capacity,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    fn id_at(&self, row: usize) -> u32 {
        debug_assert!(row < self.len);
        unsafe { *(self.ids.as_ptr().as_ptr() as *const u32).add(row) }
    }

    fn set_id(&mut self, row: usize, id: u32) {
        unsafe { *(self.ids.as_ptr().as_ptr() as *mut u32).add(row) = id }
    }

    /// Appends `entity_id` at the current length. The caller (`Archetype`)
    /// must have already checked `!is_full()`.
    pub fn push_id(&mut self, entity_id: u32) -> usize {
        debug_assert!(!self.is_full());
        let row = self.len;
        self.set_id(row, entity_id);
        self.len += 1;
        row
    }

    pub fn dec_len(&mut self) {
        debug_assert!(self.len > 0);
        self.len -= 1;
    }

    /// Address of `field_index` of the component at archetype-local slot
    /// `slot`, for `row`. `field_size` is passed in by the caller (it
    /// already has it from the registry) rather than recomputed here.
    pub fn field_ptr(&self, slot: usize, field_index: usize, row: usize, field_size: usize) -> NonNull<u8> {
        let base = self.columns[slot][field_index].as_ptr();
        unsafe {
            // `row * field_size` stays within this column's allocation:
            // the column was sized for exactly `capacity * field_size`
            // bytes and `row < capacity` is an invariant of every caller.
            NonNull::new_unchecked(base.as_ptr().add(row * field_size))
        }
    }

    pub fn column_base(&self, slot: usize, field_index: usize) -> NonNull<u8> {
        self.columns[slot][field_index].as_ptr()
    }

    pub fn column_count(&self, slot: usize) -> usize {
        self.columns[slot].len()
    }

    /// Copies every field of `src_row` onto `dst_row` within this chunk
    /// (swap-pop is always intra-chunk) and returns the id that occupied
    /// `src_row`, which the caller must re-index at `dst_row`.
    pub fn copy_row(
        &mut self,
        components: &[ComponentId],
        registry: &ComponentRegistry,
        src_row: usize,
        dst_row: usize,
    ) -> u32 {
        let moved_id = self.id_at(src_row);
        self.set_id(dst_row, moved_id);

        for (slot, &component) in components.iter().enumerate() {
            for (field_index, &field_size) in registry.field_sizes(component).iter().enumerate() {
                if field_size == 0 {
                    continue;
                }
                let col = self.columns[slot][field_index].as_ptr().as_ptr();
                unsafe {
                    let src = col.add(src_row * field_size);
                    let dst = col.add(dst_row * field_size);
                    std::ptr::copy_nonoverlapping(src, dst, field_size);
                }
            }
        }

        moved_id
    }
}
