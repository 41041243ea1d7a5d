use std::{
    alloc::{alloc, dealloc, handle_alloc_error, Layout},
    ptr::NonNull,
};

/// A raw, fixed-size byte buffer allocated at a caller-chosen alignment.
///
/// Chunk columns and `ids` arrays are never resized in place: growth always
/// means a fresh chunk (see [`crate::archetype::Archetype::append`]), so
/// this type only ever allocates once and frees once. Allocation failure is
/// fatal by policy: it calls [`handle_alloc_error`], which aborts the
/// process, the same terminate-on-OOM contract the C original implements
/// with `exit(EXIT_FAILURE)` at every allocation site.
pub(crate) struct AlignedBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl AlignedBuffer {
    /// Allocates `len` bytes aligned to `align`. `len` of zero allocates
    /// nothing and yields a dangling, zero-sized buffer (used for
    /// zero-field edge cases that should never actually be dereferenced).
    pub fn new(len: usize, align: usize) -> Self {
        if len == 0 {
            return AlignedBuffer {
                ptr: NonNull::dangling(),
                layout: Layout::from_size_align(0, align).expect("alignment must be a power of two"),
            };
        }

        let layout = Layout::from_size_align(len, align).unwrap_or_else(|_| capacity_overflow());

        let ptr = unsafe { alloc(layout) };
        let ptr = NonNull::new(ptr).unwrap_or_else(|| handle_alloc_error(layout));

        AlignedBuffer { ptr, layout }
    }

    pub fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
        }
    }
}

#[cold]
#[inline(never)]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow while computing chunk layout")
}
