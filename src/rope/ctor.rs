//! # **Pseudo-Constructors** - the only way to build interior nodes
//!
//! `leaf`, `hnode`, `vnode`, and `slice_ctor` enforce `spec.md` §3's
//! invariants (no `Empty` child of a cat, no nested `Slice`, cached depth
//! and sparsity) and perform the opportunistic simplification of §4.1.
//! `hcat`/`vcat` build on `hnode`/`vnode`, attempt the structural merges
//! first, then rebalance exactly once.

use std::sync::Arc;

use super::{Cat, Link, QuadRope, SliceNode, SparseNode, S_MAX};
use crate::error::{QuadRopeError, Result};
use crate::tile::Tile;

/// `leaf(s)`: `Empty` if either edge is zero, otherwise `Leaf(s)`.
pub(crate) fn leaf<T>(s: Tile<T>) -> Link<T> {
    if s.rows() == 0 || s.cols() == 0 {
        Arc::new(QuadRope::Empty)
    } else {
        Arc::new(QuadRope::Leaf(s))
    }
}

/// `sparse(h, w, v)`: `Empty` if either edge is zero, otherwise a constant
/// rectangle stored in O(1) space.
pub(crate) fn sparse<T>(h: usize, w: usize, v: T) -> Link<T> {
    if h == 0 || w == 0 {
        Arc::new(QuadRope::Empty)
    } else {
        Arc::new(QuadRope::Sparse(SparseNode { h, w, v }))
    }
}

pub(crate) fn empty<T>() -> Link<T> {
    Arc::new(QuadRope::Empty)
}

/// `hnode(a, b)`: raw horizontal adjacency, no merge attempt. Either side
/// being `Empty` degenerates to the other; otherwise rows must agree.
pub(crate) fn hnode<T>(a: Link<T>, b: Link<T>) -> Result<Link<T>> {
    if a.is_empty() {
        return Ok(b);
    }
    if b.is_empty() {
        return Ok(a);
    }
    if a.rows() != b.rows() {
        return Err(QuadRopeError::ShapeMismatch {
            context: "hcat",
            left: (a.rows(), a.cols()),
            right: (b.rows(), b.cols()),
        });
    }
    debug_assert_eq!(a.rows(), b.rows(), "hnode requires matching row counts");
    let depth = 1 + a.depth().max(b.depth());
    let rows = a.rows();
    let cols = a.cols() + b.cols();
    let sparse = a.is_sparse() || b.is_sparse();
    Ok(Arc::new(QuadRope::HCat(Cat { depth, rows, cols, sparse, left: a, right: b })))
}

/// `vnode(a, b)`: raw vertical adjacency, symmetric to `hnode`.
pub(crate) fn vnode<T>(a: Link<T>, b: Link<T>) -> Result<Link<T>> {
    if a.is_empty() {
        return Ok(b);
    }
    if b.is_empty() {
        return Ok(a);
    }
    if a.cols() != b.cols() {
        return Err(QuadRopeError::ShapeMismatch {
            context: "vcat",
            left: (a.rows(), a.cols()),
            right: (b.rows(), b.cols()),
        });
    }
    debug_assert_eq!(a.cols(), b.cols(), "vnode requires matching column counts");
    let depth = 1 + a.depth().max(b.depth());
    let cols = a.cols();
    let rows = a.rows() + b.rows();
    let sparse = a.is_sparse() || b.is_sparse();
    Ok(Arc::new(QuadRope::VCat(Cat { depth, rows, cols, sparse, left: a, right: b })))
}

/// `slice_ctor(i, j, h, w, r)`: clamps the window to fit `r`, collapsing
/// trivial and exact-cover cases, fusing into an existing `Slice`, and
/// reshaping `Sparse`/`Leaf` directly instead of wrapping them.
pub(crate) fn slice_ctor<T: Clone>(i: usize, j: usize, h: usize, w: usize, r: &Link<T>) -> Link<T> {
    let rows = r.rows();
    let cols = r.cols();
    let i = i.min(rows);
    let j = j.min(cols);
    let h = h.min(rows.saturating_sub(i));
    let w = w.min(cols.saturating_sub(j));
    if h == 0 || w == 0 {
        return empty();
    }
    if i == 0 && j == 0 && h == rows && w == cols {
        return r.clone();
    }
    match &**r {
        QuadRope::Slice(s) => slice_ctor(s.i + i, s.j + j, h, w, &s.inner),
        QuadRope::Sparse(sp) => sparse(h, w, sp.v.clone()),
        QuadRope::Leaf(t) => leaf(t.window(i, j, h, w)),
        _ => Arc::new(QuadRope::Slice(SliceNode { i, j, h, w, inner: r.clone() })),
    }
}

/// `hcat(a, b)`: tries the structural merges of `spec.md` §4.1 before
/// falling back to `hnode`, then rebalances the result exactly once.
pub(crate) fn hcat<T: Clone + PartialEq>(a: Link<T>, b: Link<T>) -> Result<Link<T>> {
    if a.is_empty() {
        return Ok(b);
    }
    if b.is_empty() {
        return Ok(a);
    }
    if a.rows() != b.rows() {
        return Err(QuadRopeError::ShapeMismatch {
            context: "hcat",
            left: (a.rows(), a.cols()),
            right: (b.rows(), b.cols()),
        });
    }

    // Two small leaves fuse into one.
    if let (QuadRope::Leaf(ta), QuadRope::Leaf(tb)) = (&*a, &*b) {
        if ta.cols() + tb.cols() <= S_MAX {
            return Ok(super::balance::hbalance(leaf(ta.hconcat(tb))));
        }
    }

    // Two sparse blocks of the same value merge into one.
    if let (QuadRope::Sparse(sa), QuadRope::Sparse(sb)) = (&*a, &*b) {
        if sa.v == sb.v {
            return Ok(sparse(sa.h, sa.w + sb.w, sa.v.clone()));
        }
    }

    // `a`'s rightmost leaf absorbs an incoming small leaf `b`.
    if let QuadRope::HCat(c) = &*a {
        if let (QuadRope::Leaf(t_right), QuadRope::Leaf(t_b)) = (&*c.right, &*b) {
            if t_right.cols() + t_b.cols() <= S_MAX {
                let merged = leaf(t_right.hconcat(t_b));
                let rebuilt = hnode(c.left.clone(), merged)?;
                return Ok(super::balance::hbalance(rebuilt));
            }
        }
    }

    // `b`'s leftmost leaf absorbs an incoming small leaf `a`.
    if let QuadRope::HCat(c) = &*b {
        if let (QuadRope::Leaf(t_a), QuadRope::Leaf(t_left)) = (&*a, &*c.left) {
            if t_a.cols() + t_left.cols() <= S_MAX {
                let merged = leaf(t_a.hconcat(t_left));
                let rebuilt = hnode(merged, c.right.clone())?;
                return Ok(super::balance::hbalance(rebuilt));
            }
        }
    }

    Ok(super::balance::hbalance(hnode(a, b)?))
}

/// `vcat(a, b)`: vertical counterpart of `hcat`.
pub(crate) fn vcat<T: Clone + PartialEq>(a: Link<T>, b: Link<T>) -> Result<Link<T>> {
    if a.is_empty() {
        return Ok(b);
    }
    if b.is_empty() {
        return Ok(a);
    }
    if a.cols() != b.cols() {
        return Err(QuadRopeError::ShapeMismatch {
            context: "vcat",
            left: (a.rows(), a.cols()),
            right: (b.rows(), b.cols()),
        });
    }

    if let (QuadRope::Leaf(ta), QuadRope::Leaf(tb)) = (&*a, &*b) {
        if ta.rows() + tb.rows() <= S_MAX {
            return Ok(super::balance::vbalance(leaf(ta.vconcat(tb))));
        }
    }

    if let (QuadRope::Sparse(sa), QuadRope::Sparse(sb)) = (&*a, &*b) {
        if sa.v == sb.v {
            return Ok(sparse(sa.h + sb.h, sa.w, sa.v.clone()));
        }
    }

    if let QuadRope::VCat(c) = &*a {
        if let (QuadRope::Leaf(t_bottom), QuadRope::Leaf(t_b)) = (&*c.right, &*b) {
            if t_bottom.rows() + t_b.rows() <= S_MAX {
                let merged = leaf(t_bottom.vconcat(t_b));
                let rebuilt = vnode(c.left.clone(), merged)?;
                return Ok(super::balance::vbalance(rebuilt));
            }
        }
    }

    if let QuadRope::VCat(c) = &*b {
        if let (QuadRope::Leaf(t_a), QuadRope::Leaf(t_top)) = (&*a, &*c.left) {
            if t_a.rows() + t_top.rows() <= S_MAX {
                let merged = leaf(t_a.vconcat(t_top));
                let rebuilt = vnode(merged, c.right.clone())?;
                return Ok(super::balance::vbalance(rebuilt));
            }
        }
    }

    Ok(super::balance::vbalance(vnode(a, b)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;

    fn leaf_of(h: usize, w: usize, start: i64) -> Link<i64> {
        let data: Vec<i64> = (0..(h * w) as i64).map(|x| x + start).collect();
        leaf(Tile::from_owned(data, h, w))
    }

    #[test]
    fn hnode_rejects_row_mismatch() {
        let a = leaf_of(2, 2, 0);
        let b = leaf_of(3, 2, 0);
        assert!(matches!(hnode(a, b), Err(QuadRopeError::ShapeMismatch { .. })));
    }

    #[test]
    fn hcat_fuses_small_leaves() {
        let a = leaf_of(2, 2, 0);
        let b = leaf_of(2, 2, 100);
        let r = hcat(a, b).unwrap();
        assert!(matches!(&*r, QuadRope::Leaf(_)));
        assert_eq!(r.rows(), 2);
        assert_eq!(r.cols(), 4);
    }

    #[test]
    fn hcat_merges_equal_sparse() {
        let a = sparse(3, 2, 7i64);
        let b = sparse(3, 5, 7i64);
        let r = hcat(a, b).unwrap();
        match &*r {
            QuadRope::Sparse(s) => {
                assert_eq!(s.h, 3);
                assert_eq!(s.w, 7);
                assert_eq!(s.v, 7);
            }
            _ => panic!("expected merged Sparse"),
        }
    }

    #[test]
    fn hcat_keeps_distinct_sparse_separate() {
        let a = sparse(2, 2, 1i64);
        let b = sparse(2, 2, 2i64);
        let r = hcat(a, b).unwrap();
        assert!(matches!(&*r, QuadRope::HCat(_)));
        assert!(r.is_sparse());
    }

    #[test]
    fn slice_ctor_exact_cover_returns_same_node() {
        let a = leaf_of(3, 3, 0);
        let s = slice_ctor(0, 0, 3, 3, &a);
        assert!(Arc::ptr_eq(&a, &s));
    }

    #[test]
    fn slice_ctor_fuses_nested_slices() {
        let a = leaf_of(10, 10, 0);
        let once = Arc::new(QuadRope::Slice(SliceNode { i: 1, j: 1, h: 8, w: 8, inner: a.clone() }));
        let twice = slice_ctor(1, 1, 6, 6, &once);
        match &*twice {
            QuadRope::Slice(s) => {
                assert_eq!((s.i, s.j, s.h, s.w), (2, 2, 6, 6));
                assert!(Arc::ptr_eq(&s.inner, &a));
            }
            _ => panic!("expected fused Slice"),
        }
    }
}
