use std::collections::BTreeMap;

use tracing::trace;

/// Handle to an object on the [`Heap`]. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectRef(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub value: i64,
    pub ref_count: usize,
}

/// Reference counted object store.
///
/// Objects are keyed by a monotonically increasing id. An object is
/// removed as soon as its reference count drops to zero.
#[derive(Debug, Default)]
pub struct Heap {
    objects: BTreeMap<ObjectRef, Object>,
    next_id: usize,
}

impl Heap {
    pub fn new() -> Self {
        Heap::default()
    }

    /// Stores `value` with a reference count of one.
    pub fn allocate(&mut self, value: i64) -> ObjectRef {
        let handle = ObjectRef(self.next_id);
        self.next_id += 1;

        self.objects.insert(
            handle,
            Object {
                value,
                ref_count: 1,
            },
        );
        trace!(id = handle.0, value, "allocated object");

        handle
    }

    pub fn get(&self, handle: ObjectRef) -> Option<&Object> {
        self.objects.get(&handle)
    }

    /// Adds a reference. Returns `false` if the object no longer exists.
    pub fn retain(&mut self, handle: ObjectRef) -> bool {
        match self.objects.get_mut(&handle) {
            Some(object) => {
                object.ref_count += 1;
                true
            }
            None => false,
        }
    }

    /// Drops a reference and returns the object's value, evicting the
    /// object when nothing refers to it anymore.
    pub fn release(&mut self, handle: ObjectRef) -> Option<i64> {
        let object = self.objects.get_mut(&handle)?;
        object.ref_count -= 1;
        let value = object.value;

        if object.ref_count == 0 {
            self.objects.remove(&handle);
            trace!(id = handle.0, value, "evicted object");
        }

        Some(value)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Sum of the reference counts of every live object.
    pub fn total_ref_count(&self) -> usize {
        self.objects.values().map(|object| object.ref_count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectRef, &Object)> {
        self.objects.iter()
    }
}
