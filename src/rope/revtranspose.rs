//! # **Reverse / Transpose Module**
//!
//! `spec.md` §4.5: `hrev`/`vrev` mirror the tree structurally, swapping and
//! recursing into children without touching any tile data until a `Leaf` is
//! reached; `transpose` additionally swaps the two axes (`HCat` <-> `VCat`).

use super::ctor::{hnode, sparse, vnode};
use super::{Link, QuadRope};

/// Mirrors `r` left-to-right: an `HCat`'s children swap places and each
/// recurses; a `VCat`'s children each reverse independently, keeping their
/// vertical order.
pub(crate) fn hrev<T: Clone>(r: &Link<T>) -> Link<T> {
    match &**r {
        QuadRope::Empty => r.clone(),
        QuadRope::Leaf(t) => super::ctor::leaf(t.reverse_cols()),
        QuadRope::Sparse(s) => sparse(s.h, s.w, s.v.clone()),
        QuadRope::Slice(_) => {
            let resolved = super::materialize::materialize(r);
            if matches!(&*resolved, QuadRope::Slice(_)) {
                resolved
            } else {
                hrev(&resolved)
            }
        }
        QuadRope::HCat(c) => hnode(hrev(&c.right), hrev(&c.left)).expect("hrev preserves row agreement"),
        QuadRope::VCat(c) => vnode(hrev(&c.left), hrev(&c.right)).expect("hrev preserves column agreement"),
    }
}

/// Mirrors `r` top-to-bottom; symmetric to [`hrev`].
pub(crate) fn vrev<T: Clone>(r: &Link<T>) -> Link<T> {
    match &**r {
        QuadRope::Empty => r.clone(),
        QuadRope::Leaf(t) => super::ctor::leaf(t.reverse_rows()),
        QuadRope::Sparse(s) => sparse(s.h, s.w, s.v.clone()),
        QuadRope::Slice(_) => {
            let resolved = super::materialize::materialize(r);
            if matches!(&*resolved, QuadRope::Slice(_)) {
                resolved
            } else {
                vrev(&resolved)
            }
        }
        QuadRope::HCat(c) => hnode(vrev(&c.left), vrev(&c.right)).expect("vrev preserves row agreement"),
        QuadRope::VCat(c) => vnode(vrev(&c.right), vrev(&c.left)).expect("vrev preserves column agreement"),
    }
}

/// Swaps rows and columns: a `Leaf`'s tile transposes directly, a `Sparse`
/// block swaps its edges, and an `HCat`/`VCat` swaps roles (the horizontal
/// sequence of transposed children becomes a vertical one, and vice versa).
pub(crate) fn transpose<T: Clone>(r: &Link<T>) -> Link<T> {
    match &**r {
        QuadRope::Empty => r.clone(),
        QuadRope::Leaf(t) => super::ctor::leaf(t.transpose()),
        QuadRope::Sparse(s) => sparse(s.w, s.h, s.v.clone()),
        QuadRope::Slice(_) => {
            let resolved = super::materialize::materialize(r);
            if matches!(&*resolved, QuadRope::Slice(_)) {
                resolved
            } else {
                transpose(&resolved)
            }
        }
        QuadRope::HCat(c) => vnode(transpose(&c.left), transpose(&c.right)).expect("transpose of hcat preserves column agreement"),
        QuadRope::VCat(c) => hnode(transpose(&c.left), transpose(&c.right)).expect("transpose of vcat preserves row agreement"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::ctor::{hcat, leaf as leaf_ctor, vcat};
    use crate::rope::materialize::to_flat_array;
    use crate::tile::Tile;

    fn grid(h: usize, w: usize) -> Link<i64> {
        grid_from(h, w, 0)
    }

    fn grid_from(h: usize, w: usize, start: i64) -> Link<i64> {
        let data: Vec<i64> = (0..(h * w) as i64).map(|x| x + start).collect();
        leaf_ctor(Tile::from_owned(data, h, w))
    }

    #[test]
    fn hrev_reverses_columns() {
        let r = grid(2, 3);
        let rv = hrev(&r);
        assert_eq!(to_flat_array(&rv), vec![2, 1, 0, 5, 4, 3]);
    }

    #[test]
    fn vrev_reverses_rows() {
        let r = grid(3, 2);
        let rv = vrev(&r);
        assert_eq!(to_flat_array(&rv), vec![4, 5, 2, 3, 0, 1]);
    }

    #[test]
    fn transpose_swaps_axes() {
        let r = grid(2, 3);
        let t = transpose(&r);
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(to_flat_array(&t), vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn hrev_across_hcat_boundary() {
        let a = grid(2, 2);
        let b = grid_from(2, 2, 100);
        let cat = hcat(a, b).unwrap();
        let rv = hrev(&cat);
        assert_eq!(to_flat_array(&rv), vec![101, 100, 1, 0, 103, 102, 3, 2]);
    }

    #[test]
    fn vrev_across_vcat_boundary() {
        let a = grid(2, 2);
        let b = grid_from(2, 2, 100);
        let cat = vcat(a, b).unwrap();
        let rv = vrev(&cat);
        assert_eq!(to_flat_array(&rv), vec![102, 103, 100, 101, 2, 3, 0, 1]);
    }
}
