//! # **Filter Module**
//!
//! `spec.md` §4.9: `hfilter(p, r)` requires `rows(r) == 1` and drops cells
//! of that single row for which `p` is false; `vfilter` is the column-axis
//! symmetric counterpart, requiring `cols(r) == 1`. Either call on a
//! mismatched shape fails `ShapeMismatch` rather than silently reshaping.

use super::ctor::{empty, hnode, leaf, vnode};
use super::materialize::window;
use super::{Link, QuadRope};
use crate::error::{QuadRopeError, Result};
use crate::tile::Tile;

fn hfilter_unchecked<T: Clone>(r: &Link<T>, p: &mut impl FnMut(&T) -> bool) -> Link<T> {
    match &**r {
        QuadRope::Empty => r.clone(),
        QuadRope::Leaf(t) => {
            let kept = t.filter_row(p);
            let w = kept.len();
            if w == 0 {
                empty()
            } else {
                leaf(Tile::from_owned(kept, 1, w))
            }
        }
        QuadRope::Sparse(s) => {
            if p(&s.v) {
                r.clone()
            } else {
                empty()
            }
        }
        QuadRope::Slice(s) => hfilter_unchecked(&window(s.i, s.j, s.h, s.w, &s.inner), p),
        QuadRope::HCat(c) => {
            let left = hfilter_unchecked(&c.left, p);
            let right = hfilter_unchecked(&c.right, p);
            hnode(left, right).expect("hfilter preserves the single-row shape")
        }
        QuadRope::VCat(_) => unreachable!("rows(r) == 1 rules out a VCat ever appearing here"),
    }
}

/// `hfilter(p, r)`: `r` must be a single row (`rows(r) == 1`); returns the
/// surviving cells as a (possibly narrower, possibly empty) single-row
/// rope, preserving left-to-right order.
pub(crate) fn hfilter<T: Clone>(r: &Link<T>, p: &mut impl FnMut(&T) -> bool) -> Result<Link<T>> {
    if r.rows() != 1 {
        return Err(QuadRopeError::ShapeMismatch {
            context: "hfilter",
            left: (r.rows(), r.cols()),
            right: (1, r.cols()),
        });
    }
    Ok(hfilter_unchecked(r, p))
}

fn vfilter_unchecked<T: Clone>(r: &Link<T>, p: &mut impl FnMut(&T) -> bool) -> Link<T> {
    match &**r {
        QuadRope::Empty => r.clone(),
        QuadRope::Leaf(t) => {
            let kept = t.filter_col(p);
            let h = kept.len();
            if h == 0 {
                empty()
            } else {
                leaf(Tile::from_owned(kept, h, 1))
            }
        }
        QuadRope::Sparse(s) => {
            if p(&s.v) {
                r.clone()
            } else {
                empty()
            }
        }
        QuadRope::Slice(s) => vfilter_unchecked(&window(s.i, s.j, s.h, s.w, &s.inner), p),
        QuadRope::VCat(c) => {
            let top = vfilter_unchecked(&c.left, p);
            let bottom = vfilter_unchecked(&c.right, p);
            vnode(top, bottom).expect("vfilter preserves the single-column shape")
        }
        QuadRope::HCat(_) => unreachable!("cols(r) == 1 rules out an HCat ever appearing here"),
    }
}

/// `vfilter(p, r)`: `r` must be a single column (`cols(r) == 1`); symmetric
/// to [`hfilter`].
pub(crate) fn vfilter<T: Clone>(r: &Link<T>, p: &mut impl FnMut(&T) -> bool) -> Result<Link<T>> {
    if r.cols() != 1 {
        return Err(QuadRopeError::ShapeMismatch {
            context: "vfilter",
            left: (r.rows(), r.cols()),
            right: (r.rows(), 1),
        });
    }
    Ok(vfilter_unchecked(r, p))
}
