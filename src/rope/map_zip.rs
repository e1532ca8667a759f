//! # **Map / Zip Module**
//!
//! `spec.md` §4.6: `map` and `zip` walk the tree structurally, touching
//! tile/sparse-constant data only at the leaves, and otherwise rebuilding
//! the same shape with transformed children. `zip` additionally has a fast
//! path when both operands are shaped identically (the common case after a
//! `map`), collapsing what the spec notes as a duplicated `Slice, Slice`
//! arm into the single general path below.
//!
//! A second fast path handles identical cat shapes directly: when `a` and
//! `b` are both `HCat`/`VCat` and their left children already agree on the
//! cut (same `cols`/`rows`), the children recurse pairwise with no
//! re-slicing. The general `(HCat, _)`/`(_, HCat)` arms below still cover
//! the case where the two operands disagree on where they're cut.

use super::ctor::{hnode, sparse, vnode};
use super::materialize::materialize;
use super::{Link, QuadRope};
use crate::error::{QuadRopeError, Result};

/// `map(f, r)`: applies `f` to every element, preserving shape and sparsity
/// structure (a `Sparse(h, w, v)` becomes `Sparse(h, w, f(v))`, evaluating
/// `f` once rather than `h * w` times).
pub(crate) fn map<T, U>(r: &Link<T>, f: &mut impl FnMut(&T) -> U) -> Link<U> {
    match &**r {
        QuadRope::Empty => std::sync::Arc::new(QuadRope::Empty),
        QuadRope::Leaf(t) => super::ctor::leaf(t.map(f)),
        QuadRope::Sparse(s) => sparse(s.h, s.w, f(&s.v)),
        QuadRope::Slice(s) => {
            let inner = map(&s.inner, f);
            super::ctor::slice_ctor(s.i, s.j, s.h, s.w, &inner)
        }
        QuadRope::HCat(c) => {
            hnode(map(&c.left, f), map(&c.right, f)).expect("map preserves row agreement")
        }
        QuadRope::VCat(c) => {
            vnode(map(&c.left, f), map(&c.right, f)).expect("map preserves column agreement")
        }
    }
}

/// `hmap`/`vmap` apply a function that additionally sees the absolute row
/// or column index of the element, used by operations like `init` that are
/// naturally expressed as a positional map over a uniform rope.
pub(crate) fn hmap<T, U>(r: &Link<T>, oi: usize, oj: usize, f: &mut impl FnMut(usize, usize, &T) -> U) -> Link<U> {
    match &**r {
        QuadRope::Empty => std::sync::Arc::new(QuadRope::Empty),
        QuadRope::Leaf(t) => {
            let mut data = Vec::with_capacity(t.rows() * t.cols());
            for i in 0..t.rows() {
                for j in 0..t.cols() {
                    data.push(f(oi + i, oj + j, t.get(i, j)));
                }
            }
            super::ctor::leaf(crate::tile::Tile::from_owned(data, t.rows(), t.cols()))
        }
        QuadRope::Sparse(s) => {
            let mut data = Vec::with_capacity(s.h * s.w);
            for i in 0..s.h {
                for j in 0..s.w {
                    data.push(f(oi + i, oj + j, &s.v));
                }
            }
            super::ctor::leaf(crate::tile::Tile::from_owned(data, s.h, s.w))
        }
        QuadRope::Slice(s) => {
            let inner = hmap(&s.inner, oi + s.i, oj + s.j, f);
            super::ctor::slice_ctor(s.i, s.j, s.h, s.w, &inner)
        }
        QuadRope::HCat(c) => {
            let left = hmap(&c.left, oi, oj, f);
            let right = hmap(&c.right, oi, oj + c.left.cols(), f);
            hnode(left, right).expect("hmap preserves row agreement")
        }
        QuadRope::VCat(c) => {
            let top = hmap(&c.left, oi, oj, f);
            let bottom = hmap(&c.right, oi + c.left.rows(), oj, f);
            vnode(top, bottom).expect("hmap preserves column agreement")
        }
    }
}

pub(crate) fn vmap<T, U>(r: &Link<T>, oi: usize, oj: usize, f: &mut impl FnMut(usize, usize, &T) -> U) -> Link<U> {
    hmap(r, oi, oj, f)
}

/// `zip(f, a, b)`: element-wise combination requiring `a` and `b` to share
/// shape. Two `Sparse` operands of the same shape combine in O(1); when
/// both operands have identical tree shape (the common case) each node
/// pairs directly without re-deriving offsets, which is the single general
/// recursion below — a `Slice` on either side is resolved once via
/// `materialize` rather than carrying two separate cases for `(Slice,
/// Slice)` and `(Slice, other)`.
pub(crate) fn zip<T: Clone, U: Clone, V>(
    a: &Link<T>,
    b: &Link<U>,
    f: &mut impl FnMut(&T, &U) -> V,
) -> Result<Link<V>> {
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return Err(QuadRopeError::ShapeMismatch {
            context: "zip",
            left: (a.rows(), a.cols()),
            right: (b.rows(), b.cols()),
        });
    }
    if a.is_empty() {
        return Ok(std::sync::Arc::new(QuadRope::Empty));
    }

    if matches!(&**a, QuadRope::Slice(_)) {
        return zip(&materialize(a), b, f);
    }
    if matches!(&**b, QuadRope::Slice(_)) {
        return zip(a, &materialize(b), f);
    }

    match (&**a, &**b) {
        (QuadRope::Sparse(sa), QuadRope::Sparse(sb)) => Ok(sparse(sa.h, sa.w, f(&sa.v, &sb.v))),
        (QuadRope::Leaf(ta), QuadRope::Leaf(tb)) => Ok(super::ctor::leaf(ta.map2(tb, f))),
        (QuadRope::Leaf(ta), QuadRope::Sparse(sb)) => Ok(super::ctor::leaf(ta.map(|x| f(x, &sb.v)))),
        (QuadRope::Sparse(sa), QuadRope::Leaf(tb)) => Ok(super::ctor::leaf(tb.map(|y| f(&sa.v, y)))),
        (QuadRope::HCat(ca), QuadRope::HCat(cb)) if ca.left.cols() == cb.left.cols() => {
            let left = zip(&ca.left, &cb.left, f)?;
            let right = zip(&ca.right, &cb.right, f)?;
            hnode(left, right)
        }
        (QuadRope::VCat(ca), QuadRope::VCat(cb)) if ca.left.rows() == cb.left.rows() => {
            let top = zip(&ca.left, &cb.left, f)?;
            let bottom = zip(&ca.right, &cb.right, f)?;
            vnode(top, bottom)
        }
        (QuadRope::HCat(ca), _) => {
            let lc = ca.left.cols();
            let b_left = super::ctor::slice_ctor(0, 0, b.rows(), lc, b);
            let b_right = super::ctor::slice_ctor(0, lc, b.rows(), b.cols() - lc, b);
            let left = zip(&ca.left, &b_left, f)?;
            let right = zip(&ca.right, &b_right, f)?;
            hnode(left, right)
        }
        (_, QuadRope::HCat(cb)) => {
            let lc = cb.left.cols();
            let a_left = super::ctor::slice_ctor(0, 0, a.rows(), lc, a);
            let a_right = super::ctor::slice_ctor(0, lc, a.rows(), a.cols() - lc, a);
            let left = zip(&a_left, &cb.left, f)?;
            let right = zip(&a_right, &cb.right, f)?;
            hnode(left, right)
        }
        (QuadRope::VCat(ca), _) => {
            let tr = ca.left.rows();
            let b_top = super::ctor::slice_ctor(0, 0, tr, b.cols(), b);
            let b_bottom = super::ctor::slice_ctor(tr, 0, b.rows() - tr, b.cols(), b);
            let top = zip(&ca.left, &b_top, f)?;
            let bottom = zip(&ca.right, &b_bottom, f)?;
            vnode(top, bottom)
        }
        (_, QuadRope::VCat(cb)) => {
            let tr = cb.left.rows();
            let a_top = super::ctor::slice_ctor(0, 0, tr, a.cols(), a);
            let a_bottom = super::ctor::slice_ctor(tr, 0, a.rows() - tr, a.cols(), a);
            let top = zip(&a_top, &cb.left, f)?;
            let bottom = zip(&a_bottom, &cb.right, f)?;
            vnode(top, bottom)
        }
        (QuadRope::Empty, _) | (_, QuadRope::Empty) => Ok(std::sync::Arc::new(QuadRope::Empty)),
        (QuadRope::Slice(_), _) | (_, QuadRope::Slice(_)) => unreachable!("slices resolved above"),
    }
}

/// `forall(p, r)`: true iff every element satisfies `p`, short-circuiting.
pub(crate) fn forall<T>(r: &Link<T>, p: &mut impl FnMut(&T) -> bool) -> bool {
    match &**r {
        QuadRope::Empty => true,
        QuadRope::Leaf(t) => t.iter().all(p),
        QuadRope::Sparse(s) => p(&s.v),
        QuadRope::Slice(s) => forall(&super::materialize::window(s.i, s.j, s.h, s.w, &s.inner), p),
        QuadRope::HCat(c) | QuadRope::VCat(c) => forall(&c.left, p) && forall(&c.right, p),
    }
}

/// `exists(p, r)`: true iff some element satisfies `p`, short-circuiting.
pub(crate) fn exists<T>(r: &Link<T>, p: &mut impl FnMut(&T) -> bool) -> bool {
    match &**r {
        QuadRope::Empty => false,
        QuadRope::Leaf(t) => t.iter().any(p),
        QuadRope::Sparse(s) => p(&s.v),
        QuadRope::Slice(s) => exists(&super::materialize::window(s.i, s.j, s.h, s.w, &s.inner), p),
        QuadRope::HCat(c) | QuadRope::VCat(c) => exists(&c.left, p) || exists(&c.right, p),
    }
}

/// `equals(a, b)`: shape and pointwise equality. Cheap when both operands
/// happen to be the same allocation (a common case for ropes derived from
/// one another by a no-op transform).
pub(crate) fn equals<T: Clone + PartialEq>(a: &Link<T>, b: &Link<T>) -> bool {
    if std::sync::Arc::ptr_eq(a, b) {
        return true;
    }
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return false;
    }
    super::materialize::to_flat_array(a) == super::materialize::to_flat_array(b)
}
