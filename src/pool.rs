/// Reusable-object free list.
///
/// Objects are handed back with [`Pool::release`] and popped again (LIFO) by
/// [`Pool::acquire_with`].  The pool never re-initializes anything itself:
/// whoever acquires an object must overwrite its mutable fields.

#[derive(Clone, Debug)]
pub struct Pool<T> {
    free: Vec<T>,
    constructed: usize,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            free: Vec::new(),
            constructed: 0,
        }
    }

    /// Pop a recycled object, or build a fresh one with `make`.
    pub fn acquire_with(&mut self, make: impl FnOnce() -> T) -> T {
        match self.free.pop() {
            Some(item) => item,
            None => {
                self.constructed += 1;
                make()
            }
        }
    }

    /// Return an object for later reuse.  Releasing the same object twice is
    /// not detected.
    pub fn release(&mut self, item: T) {
        self.free.push(item);
    }

    /// Number of objects waiting to be reused.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Total number of objects this pool has had to construct.
    pub fn constructed(&self) -> usize {
        self.constructed
    }
}
