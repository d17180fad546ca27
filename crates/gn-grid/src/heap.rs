//! Binary min-heap over dense integer ids with in-place key updates.
//!
//! A* relaxes the cost of nodes that are already queued.  Re-inserting them
//! would leave duplicates behind; instead each id remembers its current heap
//! slot, which makes `contains` O(1) and lets `update_key` sift the existing
//! entry instead of pushing a new one.
//!
//! Ids must be dense (`0..capacity`); the pathfinder uses row-major cell
//! indices.  The smallest key is "best".

/// Slot value for ids that are not in the heap.
const NOT_QUEUED: usize = usize::MAX;

/// Indexed binary min-heap.
#[derive(Clone, Debug)]
pub struct IndexedHeap<P> {
    /// Heap-ordered `(key, id)` entries.
    entries: Vec<(P, usize)>,
    /// `slots[id]` is the entry index of `id`, or `NOT_QUEUED`.
    slots:   Vec<usize>,
}

impl<P: Ord + Copy> IndexedHeap<P> {
    /// Empty heap that accepts ids in `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::new(), slots: vec![NOT_QUEUED; capacity] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest id + 1 this heap accepts.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Grow the id space; existing entries are kept.
    pub fn reserve_ids(&mut self, capacity: usize) {
        if capacity > self.slots.len() {
            self.slots.resize(capacity, NOT_QUEUED);
        }
    }

    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        self.slots.get(id).is_some_and(|&s| s != NOT_QUEUED)
    }

    /// Current key of `id`, if queued.
    pub fn key_of(&self, id: usize) -> Option<P> {
        match self.slots.get(id) {
            Some(&s) if s != NOT_QUEUED => Some(self.entries[s].0),
            _ => None,
        }
    }

    /// Smallest entry without removing it.
    pub fn peek(&self) -> Option<(P, usize)> {
        self.entries.first().copied()
    }

    /// Queue `id` with `key`.  An already-queued id has its key replaced.
    ///
    /// Ids at or beyond [`capacity`](Self::capacity) grow the id space.
    pub fn insert(&mut self, id: usize, key: P) {
        if self.contains(id) {
            self.update_key(id, key);
            return;
        }
        self.reserve_ids(id + 1);
        let pos = self.entries.len();
        self.entries.push((key, id));
        self.slots[id] = pos;
        self.sift_up(pos);
    }

    /// Pop the entry with the smallest key.
    pub fn remove_best(&mut self) -> Option<(P, usize)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let (key, id) = self.entries.pop()?;
        self.slots[id] = NOT_QUEUED;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((key, id))
    }

    /// Replace the key of a queued id and restore heap order.  Returns
    /// `false` (and does nothing) if `id` is not queued.
    pub fn update_key(&mut self, id: usize, key: P) -> bool {
        let Some(&pos) = self.slots.get(id) else { return false };
        if pos == NOT_QUEUED {
            return false;
        }
        let old = self.entries[pos].0;
        self.entries[pos].0 = key;
        if key < old {
            self.sift_up(pos);
        } else if key > old {
            self.sift_down(pos);
        }
        true
    }

    /// Drop every entry.  O(len), not O(capacity).
    pub fn clear(&mut self) {
        for &(_, id) in &self.entries {
            self.slots[id] = NOT_QUEUED;
        }
        self.entries.clear();
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots[self.entries[a].1] = a;
        self.slots[self.entries[b].1] = b;
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.entries[pos].0 < self.entries[parent].0 {
                self.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut best = pos;
            if left < len && self.entries[left].0 < self.entries[best].0 {
                best = left;
            }
            if right < len && self.entries[right].0 < self.entries[best].0 {
                best = right;
            }
            if best == pos {
                break;
            }
            self.swap(pos, best);
            pos = best;
        }
    }
}
