use tokio::sync::{Mutex, MutexGuard};

use crate::content::ContentType;

/// One exclusive section per content type. Every read-modify-write of a
/// type's draft/published pair happens while holding its guard.
#[derive(Debug)]
pub struct ContentLocks {
    locks: [Mutex<()>; ContentType::ALL.len()],
}

impl ContentLocks {
    pub fn new() -> Self {
        Self {
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    pub async fn lock(&self, content_type: ContentType) -> MutexGuard<'_, ()> {
        self.locks[content_type.index()].lock().await
    }

    /// Hold every section, acquired in [`ContentType::ALL`] order so two
    /// callers can never deadlock against each other.
    pub async fn lock_all(&self) -> Vec<MutexGuard<'_, ()>> {
        let mut guards = Vec::with_capacity(self.locks.len());
        for lock in &self.locks {
            guards.push(lock.lock().await);
        }
        guards
    }
}

impl Default for ContentLocks {
    fn default() -> Self {
        Self::new()
    }
}
