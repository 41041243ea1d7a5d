use {
    crate::{
        archetype::Archetype,
        config,
        error::WorldError,
        id_allocator::IdAllocator,
        iterator::{ChunkColumns, ComponentColumn, WorldIterator},
        registry::{ComponentId, ComponentRegistry},
        sparse::SparseIndex,
    },
    hashbrown::HashMap,
    smallvec::SmallVec,
    std::ptr::NonNull,
};

/// Container for a dynamic population of entities, archetype-partitioned
/// and chunk-stored.
///
/// `World` exclusively owns every archetype, chunk, column, the sparse
/// index, the free-id stack, and the component registry. Entities have no
/// identity object of their own (a plain `u32` is the entity). There is no
/// persisted state and no cross-`World` sharing: tearing a `World` down is
/// simply dropping it, which drops every chunk allocation along with it.
///
/// All operations assume single-threaded, exclusive access (see the
/// crate-level docs for the iterator/pointer invalidation contract).
pub struct World {
    registry: ComponentRegistry,
    archetypes: Vec<Archetype>,
    archetype_index: HashMap<Box<[ComponentId]>, usize>,
    sparse: SparseIndex,
    ids: IdAllocator,
    dense_chunk_size: usize,
}

impl World {
    /// Creates an empty `World`.
    ///
    /// - `dense_chunk_size`: rows per chunk.
    /// - `sparse_chunk_size`: entries per sparse sub-array; also the
    ///   initial id-stack capacity.
    /// - `initial_sparse_chunks`: sparse sub-arrays pre-allocated up front.
    ///
    /// All three are immutable for the `World`'s lifetime.
    ///
    /// # Panics
    ///
    /// Panics if `dense_chunk_size` or `sparse_chunk_size` is zero, or if
    /// `sparse_chunk_size` does not fit in a `u32` entity id space.
    pub fn create(dense_chunk_size: usize, sparse_chunk_size: usize, initial_sparse_chunks: usize) -> Self {
        assert!(dense_chunk_size > 0, "dense_chunk_size must be non-zero");
        assert!(sparse_chunk_size > 0, "sparse_chunk_size must be non-zero");

        let seed_capacity =
            u32::try_from(sparse_chunk_size).expect("sparse_chunk_size must fit in a u32 entity id space");

        log::trace!(
            "creating world: dense_chunk_size={}, sparse_chunk_size={}, initial_sparse_chunks={}",
            dense_chunk_size,
            sparse_chunk_size,
            initial_sparse_chunks,
        );

        World {
            registry: ComponentRegistry::new(),
            archetypes: Vec::new(),
            archetype_index: HashMap::new(),
            sparse: SparseIndex::new(sparse_chunk_size, initial_sparse_chunks),
            ids: IdAllocator::new(seed_capacity),
            dense_chunk_size,
        }
    }

    /// Registers a component type, described by its ordered field sizes in
    /// bytes, and returns its freshly assigned id.
    pub fn add_component_type(&mut self, field_sizes: &[usize]) -> ComponentId {
        self.registry.register_component(field_sizes)
    }

    /// Creates an entity carrying the given (unordered) set of component
    /// ids and returns its id.
    ///
    /// The signature is canonicalized (sorted ascending) before archetype
    /// lookup, so callers may list components in any order.
    ///
    /// # Panics
    ///
    /// Debug builds assert that `component_ids` contains no duplicates;
    /// spec-level this is undefined behavior, not a recoverable error.
    pub fn add_entity(&mut self, component_ids: &[ComponentId]) -> u32 {
        let mut signature: SmallVec<[ComponentId; 8]> = SmallVec::from_slice(component_ids);
        signature.sort_unstable();
        debug_assert!(
            signature.windows(2).all(|pair| pair[0] != pair[1]),
            "add_entity: duplicate component id in signature",
        );

        let archetype_index = self.archetype_for_signature(&signature);
        let entity_id = self.ids.allocate();

        let (chunk_index, row) = self.archetypes[archetype_index].append(entity_id, &self.registry);

        self.sparse.ensure_capacity(entity_id);
        self.sparse.set(entity_id, archetype_index, chunk_index, row);

        log::trace!("spawned entity {} in archetype {}", entity_id, archetype_index);

        entity_id
    }

    /// Finds or creates the archetype whose canonical signature equals
    /// `signature`, returning its index. Lookup is a hash map keyed by the
    /// signature rather than the archetype-count-by-signature-length
    /// linear scan the reference engine describes as its expected
    /// complexity class, the optimization its own re-architecture
    /// guidance recommends. Archetype ids remain stable insertion indices
    /// either way.
    fn archetype_for_signature(&mut self, signature: &[ComponentId]) -> usize {
        if let Some(&index) = self.archetype_index.get(signature) {
            return index;
        }

        let components: Box<[ComponentId]> = signature.into();
        let archetype = Archetype::new(components.clone(), &self.registry, self.dense_chunk_size)
            .unwrap_or_else(|err: WorldError| panic!("add_entity: {}", err));

        self.archetypes.push(archetype);
        let index = self.archetypes.len() - 1;
        self.archetype_index.insert(components, index);

        config::debug_check_archetype_count(self.archetypes.len());

        index
    }

    /// Removes a live entity, dropping its row via swap-pop and patching
    /// the sparse index of whichever entity moved into its place.
    ///
    /// # Panics
    ///
    /// `entity_id` must currently be live; violating this is undefined
    /// behavior (this implementation panics rather than corrupting state
    /// silently).
    pub fn remove_entity(&mut self, entity_id: u32) {
        let location = self
            .sparse
            .get(entity_id)
            .expect("remove_entity: entity id out of range");

        self.ids.free_id(entity_id);

        let archetype = &mut self.archetypes[location.archetype as usize];
        let moved = archetype.swap_pop(location.chunk as usize, location.row as usize, &self.registry);

        if let Some(moved_id) = moved {
            self.sparse.set_row(moved_id, location.row as usize);
        }

        log::trace!("removed entity {}", entity_id);
    }

    /// Returns the address of one field of one component of a live entity.
    ///
    /// Returns `None` if the entity lacks the component, the field index
    /// exceeds that component's registered field count, or `entity_id`
    /// exceeds the allocated sparse range. The returned address is valid
    /// until the next mutating call on this `World`.
    pub fn get_component_field(
        &self,
        entity_id: u32,
        component_id: ComponentId,
        field_index: usize,
    ) -> Option<NonNull<u8>> {
        let location = self.sparse.get(entity_id)?;
        let archetype = &self.archetypes[location.archetype as usize];
        let slot = archetype.has_component(component_id)?;

        if field_index >= self.registry.field_count(component_id) {
            return None;
        }

        let field_size = self.registry.field_size(component_id, field_index);
        let chunk = &archetype.chunks()[location.chunk as usize];

        Some(chunk.field_ptr(slot, field_index, location.row as usize, field_size))
    }

    /// Opens a snapshot iterator over every chunk of every archetype whose
    /// signature is a superset of `component_ids`, in archetype-creation
    /// order and, within an archetype, chunk-index order.
    ///
    /// The snapshot is invalidated by any subsequent mutating call on this
    /// `World` (see the crate-level docs); pair it with [`crate::destroy`]
    /// or simply let it drop once consumed.
    pub fn iterator(&self, component_ids: &[ComponentId]) -> WorldIterator {
        let mut chunks = Vec::new();

        for archetype in &self.archetypes {
            let slots: Option<SmallVec<[usize; 8]>> =
                component_ids.iter().map(|&id| archetype.has_component(id)).collect();

            let slots = match slots {
                Some(slots) => slots,
                None => continue,
            };

            for chunk in archetype.chunks() {
                let columns = slots
                    .iter()
                    .map(|&slot| {
                        let field_count = chunk.column_count(slot);
                        let bases = (0..field_count).map(|field_index| chunk.column_base(slot, field_index)).collect();
                        ComponentColumn { bases }
                    })
                    .collect();

                chunks.push(ChunkColumns {
                    columns,
                    len: chunk.len(),
                });
            }
        }

        WorldIterator::new(component_ids.to_vec(), chunks)
    }

    /// Number of registered component types.
    pub fn component_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of distinct archetypes currently in use.
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }
}
