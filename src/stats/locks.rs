//! Per-user critical sections
//!
//! Progress updates and unlock inserts for one user must not interleave.
//! Each user id maps to its own mutex; different users never contend here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::UserId;

/// Keyed lock table
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<HashMap<UserId, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the mutex guarding `user`.
    ///
    /// The caller locks the returned handle for the duration of its update.
    /// Entries are never evicted; the table grows with the number of users.
    pub fn for_user(&self, user: UserId) -> Arc<Mutex<()>> {
        let mut table = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        table.entry(user).or_default().clone()
    }

    /// Run `f` while holding the lock for `user`
    pub fn with_user<T>(&self, user: UserId, f: impl FnOnce() -> T) -> T {
        let lock = self.for_user(user);
        let _guard = lock.lock().unwrap_or_else(|p| p.into_inner());
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::thread;

    #[test]
    fn test_same_user_shares_lock() {
        let locks = UserLocks::new();
        assert!(Arc::ptr_eq(&locks.for_user(1), &locks.for_user(1)));
        assert!(!Arc::ptr_eq(&locks.for_user(1), &locks.for_user(2)));
    }

    #[test]
    fn test_with_user_serializes_read_modify_write() {
        let locks = UserLocks::new();
        let counter = Arc::new(AtomicU32::new(0));

        thread::scope(|s| {
            for _ in 0..8 {
                let locks = locks.clone();
                let counter = Arc::clone(&counter);
                s.spawn(move || {
                    for _ in 0..100 {
                        locks.with_user(7, || {
                            // Split load and store; only the lock keeps increments from being lost
                            let seen = counter.load(Ordering::SeqCst);
                            thread::yield_now();
                            counter.store(seen + 1, Ordering::SeqCst);
                        });
                    }
                });
            }
        });

        assert_eq!(counter.load(Ordering::SeqCst), 800);
    }
}
