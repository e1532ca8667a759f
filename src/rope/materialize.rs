//! # **Materialize Module** - resolving slices, reading out contents
//!
//! `materialize(r)` (`spec.md` §4.4) walks `r`, resolving every `Slice`
//! frame it meets into real leaves/sparse blocks/cats, while leaving
//! non-slice internal structure (the cats themselves) untouched. This
//! module also hosts the read-out operations (`row`, `col`, `to_rows`,
//! `to_cols`, `to_array_2d`, `to_flat_array`) that all bottom out in the
//! same windowed fill as `materialize`'s slice resolution.

use std::sync::Arc;

use super::ctor::{hnode, leaf, sparse, vnode};
use super::{Link, QuadRope};

/// Resolves every `Slice` node in `r`, sharing tile buffers wherever
/// possible (only a `Leaf`/`Sparse` actually gets reshaped; cats are
/// rebuilt from already-materialized children).
pub(crate) fn materialize<T: Clone>(r: &Link<T>) -> Link<T> {
    match &**r {
        QuadRope::Slice(s) => window(s.i, s.j, s.h, s.w, &s.inner),
        QuadRope::HCat(c) => {
            let a = materialize(&c.left);
            let b = materialize(&c.right);
            hnode(a, b).expect("materialize preserves row shape")
        }
        QuadRope::VCat(c) => {
            let a = materialize(&c.left);
            let b = materialize(&c.right);
            vnode(a, b).expect("materialize preserves column shape")
        }
        _ => r.clone(),
    }
}

/// Resolves the window `[i..i+h) x [j..j+w)` of `r` into a slice-free rope:
/// exact cover short-circuits, out-of-range clamps to `Empty`, `Leaf`/
/// `Sparse` reshape directly, and `HCat`/`VCat` split the window across the
/// child boundary and recombine.
pub(crate) fn window<T: Clone>(i: usize, j: usize, h: usize, w: usize, r: &Link<T>) -> Link<T> {
    let rows = r.rows();
    let cols = r.cols();
    if i >= rows || j >= cols || h == 0 || w == 0 {
        return Arc::new(QuadRope::Empty);
    }
    let h = h.min(rows - i);
    let w = w.min(cols - j);
    if i == 0 && j == 0 && h == rows && w == cols {
        return materialize(r);
    }
    match &**r {
        QuadRope::Leaf(t) => leaf(t.window(i, j, h, w)),
        QuadRope::Sparse(sp) => sparse(h, w, sp.v.clone()),
        QuadRope::Slice(s) => window(s.i + i, s.j + j, h, w, &s.inner),
        QuadRope::HCat(c) => {
            let left_cols = c.left.cols();
            if j + w <= left_cols {
                window(i, j, h, w, &c.left)
            } else if j >= left_cols {
                window(i, j - left_cols, h, w, &c.right)
            } else {
                let left_w = left_cols - j;
                let a = window(i, j, h, left_w, &c.left);
                let b = window(i, 0, h, w - left_w, &c.right);
                hnode(a, b).expect("window split preserves row shape")
            }
        }
        QuadRope::VCat(c) => {
            let top_rows = c.left.rows();
            if i + h <= top_rows {
                window(i, j, h, w, &c.left)
            } else if i >= top_rows {
                window(i - top_rows, j, h, w, &c.right)
            } else {
                let top_h = top_rows - i;
                let a = window(i, j, top_h, w, &c.left);
                let b = window(0, j, h - top_h, w, &c.right);
                vnode(a, b).expect("window split preserves column shape")
            }
        }
        QuadRope::Empty => Arc::new(QuadRope::Empty),
    }
}

/// Fills a row-major, `stride`-wide output buffer from `r`, placed at
/// absolute origin `(oi, oj)`. The only place this module allocates the
/// dense buffer readers actually want.
fn fill<T: Clone>(r: &QuadRope<T>, oi: usize, oj: usize, stride: usize, out: &mut [Option<T>]) {
    match r {
        QuadRope::Empty => {}
        QuadRope::Leaf(t) => {
            for i in 0..t.rows() {
                for j in 0..t.cols() {
                    out[(oi + i) * stride + (oj + j)] = Some(t.get(i, j).clone());
                }
            }
        }
        QuadRope::Sparse(s) => {
            for i in 0..s.h {
                for j in 0..s.w {
                    out[(oi + i) * stride + (oj + j)] = Some(s.v.clone());
                }
            }
        }
        QuadRope::Slice(s) => {
            let resolved = window(s.i, s.j, s.h, s.w, &s.inner);
            fill(&resolved, oi, oj, stride, out);
        }
        QuadRope::HCat(c) => {
            fill(&c.left, oi, oj, stride, out);
            fill(&c.right, oi, oj + c.left.cols(), stride, out);
        }
        QuadRope::VCat(c) => {
            fill(&c.left, oi, oj, stride, out);
            fill(&c.right, oi + c.left.rows(), oj, stride, out);
        }
    }
}

/// Row-major flat array of the whole rope's contents.
pub(crate) fn to_flat_array<T: Clone>(r: &Link<T>) -> Vec<T> {
    let rows = r.rows();
    let cols = r.cols();
    let mut out: Vec<Option<T>> = vec![None; rows * cols];
    fill(r, 0, 0, cols, &mut out);
    out.into_iter().map(|v| v.expect("quadrope shape invariant: every cell filled")).collect()
}

/// `row(r, i)`: the flat contents of row `i`.
pub(crate) fn row<T: Clone>(r: &Link<T>, i: usize) -> Vec<T> {
    let cols = r.cols();
    let mut out: Vec<Option<T>> = vec![None; cols];
    let resolved = window(i, 0, 1, cols, r);
    fill(&resolved, 0, 0, cols, &mut out);
    out.into_iter().map(|v| v.expect("quadrope shape invariant: every cell filled")).collect()
}

/// `col(r, j)`: the flat contents of column `j`.
pub(crate) fn col<T: Clone>(r: &Link<T>, j: usize) -> Vec<T> {
    let rows = r.rows();
    let mut out: Vec<Option<T>> = vec![None; rows];
    let resolved = window(0, j, rows, 1, r);
    fill(&resolved, 0, 0, 1, &mut out);
    out.into_iter().map(|v| v.expect("quadrope shape invariant: every cell filled")).collect()
}

pub(crate) fn to_rows<T: Clone>(r: &Link<T>) -> Vec<Vec<T>> {
    (0..r.rows()).map(|i| row(r, i)).collect()
}

pub(crate) fn to_cols<T: Clone>(r: &Link<T>) -> Vec<Vec<T>> {
    (0..r.cols()).map(|j| col(r, j)).collect()
}

pub(crate) fn to_array_2d<T: Clone>(r: &Link<T>) -> Vec<Vec<T>> {
    to_rows(r)
}
