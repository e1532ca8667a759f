//! # **Fibonacci Oracle** - balancing support
//!
//! `hbalance`/`vbalance` (see [`crate::rope::balance`]) compare a rope's depth
//! against `fib(depth + 2)`. Values are cached process-wide so repeated
//! balancing checks on deep ropes never recompute the sequence: a one-shot,
//! lazily-grown table behind a `OnceLock`, read by every thread without
//! locking once filled past the requested index.

use std::sync::OnceLock;
use std::sync::RwLock;

/// Largest depth the balancer will tolerate. `fib(45 + 2)` already exceeds
/// any rope edge length representable in a `usize` on 32-bit targets, which
/// is what bounds the recursion in `hbalance`/`vbalance`.
pub const D_MAX: usize = 45;

fn table() -> &'static RwLock<Vec<u64>> {
    static TABLE: OnceLock<RwLock<Vec<u64>>> = OnceLock::new();
    TABLE.get_or_init(|| RwLock::new(vec![0u64, 1u64]))
}

/// Returns `fib(n)` (with `fib(0) = 0`, `fib(1) = 1`), growing the shared
/// cache as needed. Concurrent readers always observe a consistent prefix;
/// growth only ever appends, so a stale snapshot is still correct, just
/// possibly short of `n`.
pub fn fib(n: usize) -> u64 {
    {
        let t = table().read().unwrap();
        if n < t.len() {
            return t[n];
        }
    }
    let mut t = table().write().unwrap();
    while t.len() <= n {
        let len = t.len();
        let next = t[len - 1] + t[len - 2];
        t.push(next);
    }
    t[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(fib(0), 0);
        assert_eq!(fib(1), 1);
        assert_eq!(fib(2), 1);
        assert_eq!(fib(3), 2);
        assert_eq!(fib(4), 3);
        assert_eq!(fib(5), 5);
        assert_eq!(fib(10), 55);
    }

    #[test]
    fn cache_is_idempotent_across_calls() {
        assert_eq!(fib(20), fib(20));
        assert_eq!(fib(15), 610);
    }
}
