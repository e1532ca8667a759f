//! # **Index Module** - single-cell read and copy-on-write update
//!
//! `spec.md` §4.2: `get` descends structurally in O(depth); `set` returns a
//! new rope equal to the original everywhere except `(i, j)`, sharing every
//! subtree untouched by the write.

use super::ctor::{leaf, sparse};
use super::{Link, QuadRope};
use crate::error::{QuadRopeError, Result};

/// `get(r, i, j)`: bounds-checks then descends; `HCat`/`VCat` pick a side
/// and translate the index, `Slice` translates by its origin, `Sparse`
/// returns its constant without touching `i`/`j`, `Leaf` delegates to the
/// tile, `Empty` always fails.
pub(crate) fn get<T: Clone>(r: &QuadRope<T>, i: usize, j: usize) -> Result<T> {
    if i >= r.rows() || j >= r.cols() {
        return Err(QuadRopeError::OutOfBounds { row: i, col: j, rows: r.rows(), cols: r.cols() });
    }
    match r {
        QuadRope::Empty => Err(QuadRopeError::OutOfBounds { row: i, col: j, rows: 0, cols: 0 }),
        QuadRope::Leaf(t) => Ok(t.get(i, j).clone()),
        QuadRope::Sparse(s) => Ok(s.v.clone()),
        QuadRope::Slice(s) => get(&s.inner, s.i + i, s.j + j),
        QuadRope::HCat(c) => {
            let lc = c.left.cols();
            if j < lc {
                get(&c.left, i, j)
            } else {
                get(&c.right, i, j - lc)
            }
        }
        QuadRope::VCat(c) => {
            let tr = c.left.rows();
            if i < tr {
                get(&c.left, i, j)
            } else {
                get(&c.right, i - tr, j)
            }
        }
    }
}

/// `set(r, i, j, v)`: copy-on-write down the single path to `(i, j)`. A
/// `Sparse` region loses its uniformity at the touched cell, so it is
/// materialized into a dense leaf first; every other shared sibling subtree
/// is reused verbatim.
pub(crate) fn set<T: Clone>(r: &Link<T>, i: usize, j: usize, v: T) -> Result<Link<T>> {
    if i >= r.rows() || j >= r.cols() {
        return Err(QuadRopeError::OutOfBounds { row: i, col: j, rows: r.rows(), cols: r.cols() });
    }
    match &**r {
        QuadRope::Empty => Err(QuadRopeError::OutOfBounds { row: i, col: j, rows: 0, cols: 0 }),
        QuadRope::Leaf(t) => Ok(leaf(t.with_cell(i, j, v))),
        QuadRope::Sparse(s) => {
            let mut data = Vec::with_capacity(s.h * s.w);
            for row in 0..s.h {
                for col in 0..s.w {
                    data.push(if row == i && col == j { v.clone() } else { s.v.clone() });
                }
            }
            Ok(leaf(crate::tile::Tile::from_owned(data, s.h, s.w)))
        }
        QuadRope::Slice(s) => {
            let updated = set(&s.inner, s.i + i, s.j + j, v)?;
            Ok(super::ctor::slice_ctor(s.i, s.j, s.h, s.w, &updated))
        }
        QuadRope::HCat(c) => {
            let lc = c.left.cols();
            if j < lc {
                let left = set(&c.left, i, j, v)?;
                super::ctor::hnode(left, c.right.clone())
            } else {
                let right = set(&c.right, i, j - lc, v)?;
                super::ctor::hnode(c.left.clone(), right)
            }
        }
        QuadRope::VCat(c) => {
            let tr = c.left.rows();
            if i < tr {
                let left = set(&c.left, i, j, v)?;
                super::ctor::vnode(left, c.right.clone())
            } else {
                let right = set(&c.right, i - tr, j, v)?;
                super::ctor::vnode(c.left.clone(), right)
            }
        }
    }
}
