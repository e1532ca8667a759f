//! # **Tile Module** - dense rectangular leaf storage
//!
//! A [`Tile`] is a contiguous rectangular buffer plus an origin-and-size
//! window onto it — the "array slice" of `spec.md` §3. Tiles back every
//! [`crate::rope::QuadRope::Leaf`] and are the only place actual element
//! storage lives; everything above this layer is structure.
//!
//! Tiles are immutable once built: the buffer is an `Arc<[T]>`, so cloning a
//! tile (or windowing it) is a pointer-and-metadata copy, never a data copy.
//! The only place a fresh buffer gets *written* is the target layer
//! ([`crate::target`]), which freezes into an `Arc<[T]>` that tiles then
//! wrap.

use std::sync::Arc;

/// Dense rectangular view over a shared buffer.
///
/// Invariant: `0 <= i0`, `0 <= j0`, `i0 + h <= buf.len() / row_stride`,
/// `j0 + w <= row_stride`. Elements are stored row-major with `row_stride`
/// elements between the start of consecutive rows of the *underlying*
/// buffer (which may be wider than this tile's own `w`, when the tile is a
/// window into a larger target).
#[derive(Clone)]
pub(crate) struct Tile<T> {
    buf: Arc<[T]>,
    row_stride: usize,
    i0: usize,
    j0: usize,
    h: usize,
    w: usize,
}

impl<T> Tile<T> {
    /// Wraps an entire owned, row-major `h x w` buffer as a tile.
    pub fn from_owned(data: Vec<T>, h: usize, w: usize) -> Self {
        debug_assert_eq!(data.len(), h * w);
        Tile { buf: Arc::from(data.into_boxed_slice()), row_stride: w, i0: 0, j0: 0, h, w }
    }

    /// Wraps a buffer already shared behind an `Arc`, together with the
    /// window that this tile occupies within it.
    pub fn from_shared(buf: Arc<[T]>, row_stride: usize, i0: usize, j0: usize, h: usize, w: usize) -> Self {
        debug_assert!(i0 + h <= buf.len() / row_stride.max(1) || h == 0);
        debug_assert!(j0 + w <= row_stride || w == 0);
        Tile { buf, row_stride, i0, j0, h, w }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.w
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        (self.i0 + i) * self.row_stride + (self.j0 + j)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &T {
        debug_assert!(i < self.h && j < self.w);
        &self.buf[self.index(i, j)]
    }

    /// A sub-window `[i..i+h) x [j..j+w)` of this tile, sharing the buffer.
    pub fn window(&self, i: usize, j: usize, h: usize, w: usize) -> Tile<T> {
        debug_assert!(i + h <= self.h && j + w <= self.w);
        Tile { buf: self.buf.clone(), row_stride: self.row_stride, i0: self.i0 + i, j0: self.j0 + j, h, w }
    }

    /// Row-major iteration in reading order, one reference per cell.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.h).flat_map(move |i| (0..self.w).map(move |j| self.get(i, j)))
    }
}

impl<T: Clone> Tile<T> {
    /// One cell changed, copy-on-write at the tile buffer: the whole window
    /// is copied into a fresh owned buffer with `(i, j)` replaced.
    pub fn with_cell(&self, i: usize, j: usize, v: T) -> Tile<T> {
        debug_assert!(i < self.h && j < self.w);
        let mut data = Vec::with_capacity(self.h * self.w);
        for r in 0..self.h {
            for c in 0..self.w {
                if r == i && c == j {
                    data.push(v.clone());
                } else {
                    data.push(self.get(r, c).clone());
                }
            }
        }
        Tile::from_owned(data, self.h, self.w)
    }

    /// Horizontal concatenation of two tiles of equal height, by copying
    /// both into one freshly allocated row-major buffer. Used by `hcat`'s
    /// small-leaf fusion fast path (`spec.md` §4.1).
    pub fn hconcat(&self, other: &Tile<T>) -> Tile<T> {
        debug_assert_eq!(self.h, other.h);
        let w = self.w + other.w;
        let mut data = Vec::with_capacity(self.h * w);
        for r in 0..self.h {
            for c in 0..self.w {
                data.push(self.get(r, c).clone());
            }
            for c in 0..other.w {
                data.push(other.get(r, c).clone());
            }
        }
        Tile::from_owned(data, self.h, w)
    }

    /// Vertical concatenation of two tiles of equal width.
    pub fn vconcat(&self, other: &Tile<T>) -> Tile<T> {
        debug_assert_eq!(self.w, other.w);
        let h = self.h + other.h;
        let mut data = Vec::with_capacity(h * self.w);
        for r in 0..self.h {
            for c in 0..self.w {
                data.push(self.get(r, c).clone());
            }
        }
        for r in 0..other.h {
            for c in 0..other.w {
                data.push(other.get(r, c).clone());
            }
        }
        Tile::from_owned(data, h, self.w)
    }

    /// Materializes the tile as a fresh, tightly-packed owned tile (row
    /// stride equal to its own width). Used when a windowed tile must be
    /// copied out of a larger shared buffer.
    pub fn to_owned_tile(&self) -> Tile<T> {
        if self.row_stride == self.w && self.i0 == 0 && self.j0 == 0 {
            return self.clone();
        }
        let mut data = Vec::with_capacity(self.h * self.w);
        for r in 0..self.h {
            for c in 0..self.w {
                data.push(self.get(r, c).clone());
            }
        }
        Tile::from_owned(data, self.h, self.w)
    }

    pub fn reverse_rows(&self) -> Tile<T> {
        let mut data = Vec::with_capacity(self.h * self.w);
        for r in (0..self.h).rev() {
            for c in 0..self.w {
                data.push(self.get(r, c).clone());
            }
        }
        Tile::from_owned(data, self.h, self.w)
    }

    pub fn reverse_cols(&self) -> Tile<T> {
        let mut data = Vec::with_capacity(self.h * self.w);
        for r in 0..self.h {
            for c in (0..self.w).rev() {
                data.push(self.get(r, c).clone());
            }
        }
        Tile::from_owned(data, self.h, self.w)
    }

    pub fn transpose(&self) -> Tile<T> {
        let mut data = Vec::with_capacity(self.h * self.w);
        for c in 0..self.w {
            for r in 0..self.h {
                data.push(self.get(r, c).clone());
            }
        }
        Tile::from_owned(data, self.w, self.h)
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Tile<U> {
        let mut data = Vec::with_capacity(self.h * self.w);
        for r in 0..self.h {
            for c in 0..self.w {
                data.push(f(self.get(r, c)));
            }
        }
        Tile::from_owned(data, self.h, self.w)
    }

    pub fn map2<U, V>(&self, other: &Tile<U>, mut f: impl FnMut(&T, &U) -> V) -> Tile<V> {
        debug_assert_eq!(self.h, other.h);
        debug_assert_eq!(self.w, other.w);
        let mut data = Vec::with_capacity(self.h * self.w);
        for r in 0..self.h {
            for c in 0..self.w {
                data.push(f(self.get(r, c), other.get(r, c)));
            }
        }
        Tile::from_owned(data, self.h, self.w)
    }

    pub fn reduce(&self, zero: &T, f: &mut impl FnMut(T, &T) -> T) -> T {
        let mut acc = zero.clone();
        for v in self.iter() {
            acc = f(acc, v);
        }
        acc
    }

    /// Filters along the single row this tile represents (`rows() == 1`),
    /// returning the surviving values in order.
    pub fn filter_row(&self, p: &mut impl FnMut(&T) -> bool) -> Vec<T> {
        debug_assert_eq!(self.h, 1);
        (0..self.w).filter(|&c| p(self.get(0, c))).map(|c| self.get(0, c).clone()).collect()
    }

    /// Filters along the single column this tile represents (`cols() == 1`).
    pub fn filter_col(&self, p: &mut impl FnMut(&T) -> bool) -> Vec<T> {
        debug_assert_eq!(self.w, 1);
        (0..self.h).filter(|&r| p(self.get(r, 0))).map(|r| self.get(r, 0).clone()).collect()
    }

    /// 1-D prefix scan along the row axis (used by `hscan`, and by `scan`
    /// when it needs a one-row/one-column border).
    pub fn hscan(&self, init: impl Fn(usize) -> T, plus: &mut impl FnMut(&T, &T) -> T) -> Tile<T> {
        let mut data = Vec::with_capacity(self.h * self.w);
        for r in 0..self.h {
            let mut acc = init(r);
            for c in 0..self.w {
                acc = plus(&acc, self.get(r, c));
                data.push(acc.clone());
            }
        }
        Tile::from_owned(data, self.h, self.w)
    }

    /// 1-D prefix scan along the column axis.
    pub fn vscan(&self, init: impl Fn(usize) -> T, plus: &mut impl FnMut(&T, &T) -> T) -> Tile<T> {
        let mut out: Vec<Option<T>> = vec![None; self.h * self.w];
        for c in 0..self.w {
            let mut acc = init(c);
            for r in 0..self.h {
                acc = plus(&acc, self.get(r, c));
                out[r * self.w + c] = Some(acc.clone());
            }
        }
        let data: Vec<T> = out.into_iter().map(|v| v.expect("every cell written by column pass")).collect();
        Tile::from_owned(data, self.h, self.w)
    }
}
