//! # **Structure Module** - slicing, splitting, and physical layout
//!
//! `spec.md` §6 lists `slice`/`hslice`/`vslice`/`hsplit2`/`vsplit2`/`split4`
//! alongside `reallocate` and `compress` as the structural operations. The
//! first group all bottom out in [`super::ctor::slice_ctor`]; `reallocate`
//! and `compress` are the two directions of physical layout change that
//! don't touch logical content — `reallocate` collapses a rope into one
//! contiguous tile, `compress` is its opposite, scanning for runs of a
//! repeated value and replacing them with `Sparse` nodes.

use std::sync::Arc;

use super::ctor::{hnode, leaf, sparse, vnode};
use super::materialize::to_flat_array;
use super::{Link, QuadRope};

/// `slice(r, i, j, h, w)`: a clamped rectangular view, per `spec.md` §6.
pub(crate) fn slice<T: Clone>(r: &Link<T>, i: usize, j: usize, h: usize, w: usize) -> Link<T> {
    super::ctor::slice_ctor(i, j, h, w, r)
}

/// `hslice(r, j, w)`: the full-height vertical band `[j, j + w)`.
pub(crate) fn hslice<T: Clone>(r: &Link<T>, j: usize, w: usize) -> Link<T> {
    slice(r, 0, j, r.rows(), w)
}

/// `vslice(r, i, h)`: the full-width horizontal band `[i, i + h)`.
pub(crate) fn vslice<T: Clone>(r: &Link<T>, i: usize, h: usize) -> Link<T> {
    slice(r, i, 0, h, r.cols())
}

/// `hsplit2(r)`: splits `r` into its left and right halves (by column
/// count), used by parallel fork points that want two roughly-equal pieces
/// without relying on `r` already being an `HCat`.
pub(crate) fn hsplit2<T: Clone>(r: &Link<T>) -> (Link<T>, Link<T>) {
    let cols = r.cols();
    let left_w = cols / 2;
    (hslice(r, 0, left_w), hslice(r, left_w, cols - left_w))
}

/// `vsplit2(r)`: splits `r` into its top and bottom halves (by row count).
pub(crate) fn vsplit2<T: Clone>(r: &Link<T>) -> (Link<T>, Link<T>) {
    let rows = r.rows();
    let top_h = rows / 2;
    (vslice(r, 0, top_h), vslice(r, top_h, rows - top_h))
}

/// `split4(r)`: the four quadrants NW, NE, SW, SE, used by `par4` and the
/// `map_until` progress-splitting operator.
pub(crate) fn split4<T: Clone>(r: &Link<T>) -> (Link<T>, Link<T>, Link<T>, Link<T>) {
    let rows = r.rows();
    let cols = r.cols();
    let top_h = rows / 2;
    let left_w = cols / 2;
    let nw = slice(r, 0, 0, top_h, left_w);
    let ne = slice(r, 0, left_w, top_h, cols - left_w);
    let sw = slice(r, top_h, 0, rows - top_h, left_w);
    let se = slice(r, top_h, left_w, rows - top_h, cols - left_w);
    (nw, ne, sw, se)
}

/// Recursively writes `r`'s contents into `t`, advancing the cursor at each
/// cat exactly as `spec.md` §5 describes: a child of an `HCat` advances by
/// `cols(left)`, a child of a `VCat` by `rows(top)`, so sibling writes land
/// in disjoint rectangles of the one shared buffer.
fn fill_target<T: Clone>(r: &QuadRope<T>, t: &crate::target::Target<T>) {
    match r {
        QuadRope::Empty => {}
        QuadRope::Leaf(tile) => {
            for i in 0..tile.rows() {
                for j in 0..tile.cols() {
                    t.write(i, j, tile.get(i, j).clone());
                }
            }
        }
        QuadRope::Sparse(s) => {
            for i in 0..s.h {
                for j in 0..s.w {
                    t.write(i, j, s.v.clone());
                }
            }
        }
        QuadRope::Slice(s) => {
            let resolved = super::materialize::window(s.i, s.j, s.h, s.w, &s.inner);
            fill_target(&resolved, t);
        }
        QuadRope::HCat(c) => {
            let lc = c.left.cols();
            fill_target(&c.left, &t.window(0, 0, t.rows(), lc));
            fill_target(&c.right, &t.window(0, lc, t.rows(), t.cols() - lc));
        }
        QuadRope::VCat(c) => {
            let tr = c.left.rows();
            fill_target(&c.left, &t.window(0, 0, tr, t.cols()));
            fill_target(&c.right, &t.window(tr, 0, t.rows() - tr, t.cols()));
        }
    }
}

/// `reallocate(r)`: collapses the whole tree into a single contiguous
/// `Leaf`, regardless of how deeply catted or sliced it was. Content is
/// unchanged; only the physical layout is forced flat, trading rebalance
/// cost later for O(1) future indexing depth. Writes through one shared
/// `Target` rather than through an intermediate `Vec<Option<T>>`, the same
/// buffer discipline bulk parallel operations use.
pub(crate) fn reallocate<T: Clone>(r: &Link<T>) -> Link<T> {
    if matches!(&**r, QuadRope::Leaf(_) | QuadRope::Empty) {
        return r.clone();
    }
    let rows = r.rows();
    let cols = r.cols();
    if rows == 0 || cols == 0 {
        return Arc::new(QuadRope::Empty);
    }
    let target = crate::target::Target::new(rows, cols);
    fill_target(r, &target);
    let buf = target.freeze();
    leaf(crate::tile::Tile::from_shared(buf, cols, 0, 0, rows, cols))
}

/// `compress(r)`: the opposite direction of `reallocate` — scans `r` and
/// replaces any maximal rectangle of a single repeated value with a
/// `Sparse` node, shrinking storage without changing `get`-visible content.
/// Unlike `reallocate` this stays structural: only `Leaf`/`Sparse` content
/// is inspected, cats are rebuilt from compressed children.
pub(crate) fn compress<T: Clone + PartialEq>(r: &Link<T>) -> Link<T> {
    match &**r {
        QuadRope::Empty | QuadRope::Sparse(_) => r.clone(),
        QuadRope::Leaf(t) => {
            let mut it = t.iter();
            let first = match it.next() {
                Some(v) => v.clone(),
                None => return r.clone(),
            };
            if it.all(|v| *v == first) {
                sparse(t.rows(), t.cols(), first)
            } else {
                r.clone()
            }
        }
        QuadRope::Slice(s) => {
            let resolved = super::materialize::window(s.i, s.j, s.h, s.w, &s.inner);
            compress(&resolved)
        }
        QuadRope::HCat(c) => {
            let left = compress(&c.left);
            let right = compress(&c.right);
            match (&*left, &*right) {
                (QuadRope::Sparse(sa), QuadRope::Sparse(sb)) if sa.v == sb.v => {
                    sparse(sa.h, sa.w + sb.w, sa.v.clone())
                }
                _ => hnode(left, right).expect("compress preserves row agreement"),
            }
        }
        QuadRope::VCat(c) => {
            let top = compress(&c.left);
            let bottom = compress(&c.right);
            match (&*top, &*bottom) {
                (QuadRope::Sparse(sa), QuadRope::Sparse(sb)) if sa.v == sb.v => {
                    sparse(sa.h + sb.h, sa.w, sa.v.clone())
                }
                _ => vnode(top, bottom).expect("compress preserves column agreement"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::ctor::leaf as leaf_ctor;
    use crate::tile::Tile;

    fn grid(h: usize, w: usize) -> Link<i64> {
        let data: Vec<i64> = (0..(h * w) as i64).collect();
        leaf_ctor(Tile::from_owned(data, h, w))
    }

    #[test]
    fn split4_partitions_into_four_quadrants() {
        let r = grid(4, 4);
        let (nw, ne, sw, se) = split4(&r);
        assert_eq!(to_flat_array(&nw), vec![0, 1, 4, 5]);
        assert_eq!(to_flat_array(&ne), vec![2, 3, 6, 7]);
        assert_eq!(to_flat_array(&sw), vec![8, 9, 12, 13]);
        assert_eq!(to_flat_array(&se), vec![10, 11, 14, 15]);
    }

    #[test]
    fn hsplit2_and_vsplit2_cover_whole_rope() {
        let r = grid(2, 5);
        let (l, rr) = hsplit2(&r);
        assert_eq!(l.cols() + rr.cols(), 5);
        let mut combined = to_flat_array(&l);
        combined.extend(to_flat_array(&rr));
        // Row-major concatenation of two full-height bands isn't the same
        // as row-major of the whole (columns interleave per row), so check
        // totals instead of order.
        assert_eq!(combined.len(), 10);

        let (t, b) = vsplit2(&r);
        assert_eq!(t.rows() + b.rows(), 2);
    }

    #[test]
    fn reallocate_flattens_to_single_leaf() {
        let a = grid(2, 2);
        let b = grid(2, 2);
        let cat = hnode(a, b).unwrap();
        let flat_before = to_flat_array(&cat);
        let r = reallocate(&cat);
        assert!(matches!(&*r, QuadRope::Leaf(_)));
        assert_eq!(to_flat_array(&r), flat_before);
    }

    #[test]
    fn compress_collapses_constant_leaf_to_sparse() {
        let t = leaf_ctor(Tile::from_owned(vec![7i64; 9], 3, 3));
        let c = compress(&t);
        assert!(matches!(&*c, QuadRope::Sparse(_)));
        assert_eq!(to_flat_array(&c), vec![7i64; 9]);
    }

    #[test]
    fn compress_merges_adjacent_equal_sparse_after_recursion() {
        let a = leaf_ctor(Tile::from_owned(vec![5i64; 4], 2, 2));
        let b = leaf_ctor(Tile::from_owned(vec![5i64; 4], 2, 2));
        let cat = hnode(a, b).unwrap();
        let c = compress(&cat);
        match &*c {
            QuadRope::Sparse(s) => {
                assert_eq!((s.h, s.w), (2, 4));
            }
            _ => panic!("expected merged Sparse"),
        }
    }
}
