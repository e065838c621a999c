//! Slot storage for live sessions, with index reuse.

/// Fixed-identity storage: each inserted item keeps its index until removed,
/// and freed indices are reused for later insertions.
///
/// Slots are temporarily vacated while the scheduler is resuming the session
/// they hold, so occupancy is tracked per slot rather than with a separate
/// free bitmap.
pub(crate) struct Slab<T> {
    items: Vec<Option<T>>,
    free: Vec<usize>,
}

impl<T> Slab<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, item: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.items[index] = Some(item);
                index
            }
            None => {
                self.items.push(Some(item));
                self.items.len() - 1
            }
        }
    }

    /// Vacates a slot without freeing its index. The caller must either
    /// [`restore`](Self::restore) the slot or [`remove`](Self::remove) it.
    pub(crate) fn take(&mut self, index: usize) -> Option<T> {
        self.items.get_mut(index)?.take()
    }

    pub(crate) fn restore(&mut self, index: usize, item: T) {
        self.items[index] = Some(item);
    }

    /// Frees a slot for reuse. Accepts an already-vacated slot, since the
    /// scheduler removes sessions whose value it is still holding.
    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        let item = self.items.get_mut(index)?.take();
        self.free.push(index);
        item
    }
}
