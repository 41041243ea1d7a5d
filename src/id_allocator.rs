/// LIFO stack of free entity ids.
///
/// Seeded at construction with `{0, 1, ..., capacity - 1}`; `allocate`
/// pops, `free` pushes, and the stack never shrinks. On exhaustion,
/// `allocate` doubles the tracked capacity and seeds the freshly appended
/// range with its own id values before popping, so growth and the initial
/// seed share identical semantics.
pub(crate) struct IdAllocator {
    free: Vec<u32>,
    capacity: u32,
}

impl IdAllocator {
    /// Seeds the stack with `capacity` ids, lowest id on top (allocated
    /// first).
    pub fn new(capacity: u32) -> Self {
        let free = (0..capacity).rev().collect();
        IdAllocator { free, capacity }
    }

    /// Pops the next free id, growing and reseeding if the stack is empty.
    pub fn allocate(&mut self) -> u32 {
        if self.free.is_empty() {
            let old_capacity = self.capacity;
            let new_capacity = old_capacity
                .checked_mul(2)
                .expect("id allocator capacity overflowed u32::MAX");

            // Highest-to-lowest so the lowest new id ends up on top.
            self.free.extend((old_capacity..new_capacity).rev());
            self.capacity = new_capacity;

            log::debug!("id allocator grew from {} to {} ids", old_capacity, new_capacity);
        }

        self.free
            .pop()
            .expect("id allocator stack was just grown and cannot be empty")
    }

    pub fn free_id(&mut self, id: u32) {
        self.free.push(id);
    }
}
