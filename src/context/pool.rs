//! Bounded context free list.

use parking_lot::Mutex;

use crate::context::Context;

/// Reuses contexts across requests. `acquire` never waits for a context to
/// come back: an empty list just allocates. `release` keeps at most
/// `capacity` instances and drops the rest.
pub(crate) struct ContextPool {
    free: Mutex<Vec<Box<Context>>>,
    capacity: usize,
    params_capacity: usize,
}

impl ContextPool {
    pub(crate) fn new(capacity: usize, params_capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            capacity,
            params_capacity,
        }
    }

    pub(crate) fn acquire(&self) -> Box<Context> {
        if let Some(ctx) = self.free.lock().pop() {
            return ctx;
        }
        Box::new(Context::with_params_capacity(self.params_capacity))
    }

    pub(crate) fn release(&self, ctx: Box<Context>) {
        let mut free = self.free.lock();
        if free.len() < self.capacity {
            free.push(ctx);
        }
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_on_empty_pool_allocates() {
        let pool = ContextPool::new(2, 4);
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(pool.idle(), 0);
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn release_beyond_capacity_drops() {
        let pool = ContextPool::new(1, 0);
        let a = pool.acquire();
        let b = pool.acquire();
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.idle(), 1);
    }
}
