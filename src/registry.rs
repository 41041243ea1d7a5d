use smallvec::SmallVec;

/// Identifies a registered component type.
///
/// Assigned sequentially starting at zero when a component is registered
/// and never reused. Two registrations with identical field layouts still
/// receive distinct ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentId(pub(crate) u32);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct ComponentRecord {
    field_sizes: SmallVec<[usize; 4]>,
}

impl ComponentRecord {
    fn entity_stride(&self) -> usize {
        self.field_sizes.iter().sum()
    }
}

/// Records the field layout of every registered component type.
///
/// Registration is append-only and the record is never validated beyond
/// "at least one field": field sizes are recorded verbatim, byte-scale,
/// primitive/POD values, exactly as the caller describes them.
#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    records: Vec<ComponentRecord>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        ComponentRegistry {
            records: Vec::new(),
        }
    }

    /// Registers a component with the given ordered field sizes (in bytes)
    /// and returns its freshly assigned id. Fields keep registration order;
    /// they are addressed by index from here on.
    ///
    /// # Panics
    ///
    /// Panics if `field_sizes` is empty.
    pub fn register_component(&mut self, field_sizes: &[usize]) -> ComponentId {
        assert!(
            !field_sizes.is_empty(),
            "register_component: a component must describe at least one field",
        );

        let id = ComponentId(self.records.len() as u32);
        self.records.push(ComponentRecord {
            field_sizes: SmallVec::from_slice(field_sizes),
        });

        log::trace!("registered component {:?} with {} field(s)", id, field_sizes.len());

        id
    }

    pub fn field_count(&self, id: ComponentId) -> usize {
        self.records[id.index()].field_sizes.len()
    }

    pub fn field_size(&self, id: ComponentId, field_index: usize) -> usize {
        self.records[id.index()].field_sizes[field_index]
    }

    pub fn field_sizes(&self, id: ComponentId) -> &[usize] {
        &self.records[id.index()].field_sizes
    }

    pub(crate) fn entity_stride(&self, id: ComponentId) -> usize {
        self.records[id.index()].entity_stride()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
