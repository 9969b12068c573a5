use parking_lot::Mutex;

/// A value that can be checked out of a [`Pool`] repeatedly.
pub trait Reusable: Default {
    /// Drops per-use state and references while keeping allocated storage.
    fn reset(&mut self);
}

impl Reusable for Vec<u8> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// Free list of reusable values with an explicit checkout / checkin lifecycle.
///
/// `get` hands out a previously returned value or a fresh default one; `put`
/// resets the value and keeps it for the next caller, unless `max_idle`
/// values are already parked.
#[derive(Debug)]
pub struct Pool<T: Reusable> {
    free: Mutex<Vec<T>>,
    max_idle: usize,
}

impl<T: Reusable> Pool<T> {
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    pub fn get(&self) -> T {
        self.free.lock().pop().unwrap_or_default()
    }

    pub fn put(&self, mut item: T) {
        item.reset();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(item);
        }
    }

    /// Number of values currently parked in the pool.
    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

impl<T: Reusable> Default for Pool<T> {
    fn default() -> Self {
        Self::new(64)
    }
}
