//! # **Target Module** - mutable scratch behind an immutable API
//!
//! A [`Target`] is the pre-allocated rectangular scratch buffer that bulk
//! operations thread through their recursion (`spec.md` §5). Sibling
//! sub-results write into disjoint rectangles of the *same* buffer, so the
//! materialized output is one dense allocation even though the logical
//! shape being produced is a tree.
//!
//! A `Target` handle is cheap to clone (an `Arc` bump) and cheap to window
//! (pointer arithmetic only); writing is the only unsafe surface, and it is
//! sound because every caller in this crate partitions a target into
//! disjoint windows *before* recursing — no two live handles ever address
//! the same cell.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::Arc;

struct RawBuf<T> {
    data: UnsafeCell<Box<[MaybeUninit<T>]>>,
    cols: usize,
}

// SAFETY: writers never overlap (see module docs); `T: Send` is enough to
// hand a `RawBuf<T>` to another thread, matching the same reasoning the
// teacher applies to its own shared buffer type.
unsafe impl<T: Send> Sync for RawBuf<T> {}
unsafe impl<T: Send> Send for RawBuf<T> {}

/// A rectangular window into a shared scratch buffer, with an absolute
/// origin `(oi, oj)` and a local size `(h, w)` that bounds the cells this
/// handle is allowed to write.
pub(crate) struct Target<T> {
    buf: Arc<RawBuf<T>>,
    oi: usize,
    oj: usize,
    h: usize,
    w: usize,
}

impl<T> Clone for Target<T> {
    fn clone(&self) -> Self {
        Target { buf: self.buf.clone(), oi: self.oi, oj: self.oj, h: self.h, w: self.w }
    }
}

impl<T> Target<T> {
    /// Allocates a fresh `rows x cols` scratch buffer, with this handle
    /// spanning the whole thing.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut v = Vec::with_capacity(rows * cols);
        v.resize_with(rows * cols, MaybeUninit::uninit);
        Target {
            buf: Arc::new(RawBuf { data: UnsafeCell::new(v.into_boxed_slice()), cols }),
            oi: 0,
            oj: 0,
            h: rows,
            w: cols,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.w
    }

    /// A sub-window of this window, offset `(di, dj)` and sized `(h, w)`,
    /// sharing the same backing allocation. This is how `hcat`/`vcat`
    /// recursion hands each child its own disjoint rectangle: the cursor
    /// advance described in `spec.md` §4.6/§5 is just `window(0, cols(a),
    /// ..)` for the right child of an `HCat`.
    pub fn window(&self, di: usize, dj: usize, h: usize, w: usize) -> Target<T> {
        debug_assert!(di + h <= self.h && dj + w <= self.w);
        Target { buf: self.buf.clone(), oi: self.oi + di, oj: self.oj + dj, h, w }
    }

    /// Writes `v` at the local `(i, j)` of this window. Every cell reachable
    /// from the top-level target must be written exactly once along any
    /// recursion path before `freeze` is called.
    pub fn write(&self, i: usize, j: usize, v: T) {
        debug_assert!(i < self.h && j < self.w, "target write out of window bounds");
        let idx = (self.oi + i) * self.buf.cols + (self.oj + j);
        // SAFETY: callers partition a target into disjoint windows before
        // recursing (see module docs), so this index is never written by
        // more than one live `Target` handle, and never read before freeze.
        unsafe {
            let ptr = (*self.buf.data.get()).as_mut_ptr();
            ptr.add(idx).write(MaybeUninit::new(v));
        }
    }

    /// Freezes the *whole* allocation this target was created over into a
    /// tile-ready `Arc<[T]>`. Only valid once every cell has been written
    /// and no other `Target` handle over the same buffer is still alive
    /// (enforced by `Arc::try_unwrap`, which fails otherwise).
    pub fn freeze(self) -> Arc<[T]> {
        let raw = Arc::try_unwrap(self.buf).unwrap_or_else(|_| {
            panic!("quadrope: target buffer frozen while a sibling handle is still outstanding")
        });
        let boxed = raw.data.into_inner();
        let len = boxed.len();
        let ptr = Box::into_raw(boxed) as *mut T;
        // SAFETY: every index of the allocation has been written by the
        // recursion that produced this target (the caller's contract), and
        // `MaybeUninit<T>` is layout-identical to `T`, so reinterpreting the
        // fully-initialized buffer as `[T]` is valid.
        let init: Box<[T]> = unsafe { Box::from_raw(std::slice::from_raw_parts_mut(ptr, len)) };
        Arc::from(init)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_windows_write_and_freeze() {
        let t = Target::<i32>::new(2, 4);
        let left = t.window(0, 0, 2, 2);
        let right = t.window(0, 2, 2, 2);
        for i in 0..2 {
            for j in 0..2 {
                left.write(i, j, (i * 2 + j) as i32);
                right.write(i, j, 100 + (i * 2 + j) as i32);
            }
        }
        drop(left);
        drop(right);
        let frozen = t.freeze();
        assert_eq!(&*frozen, &[0, 1, 100, 101, 2, 3, 102, 103]);
    }

    #[test]
    #[should_panic(expected = "outstanding")]
    fn freeze_panics_if_shared() {
        let t = Target::<i32>::new(1, 1);
        let other = t.clone();
        t.write(0, 0, 1);
        drop(other);
        // `other` dropped, but we keep a second clone alive deliberately.
        let keep = t.clone();
        t.freeze();
        drop(keep);
    }
}
