//! # **Balancing** - Fibonacci-bounded depth
//!
//! `spec.md` §4.3: a rope is horizontally balanced at its root if
//! `depth < D_MAX && fib(depth + 2) <= width` (vertically, symmetric with
//! height). `hcat`/`vcat` each invoke their balancer exactly once on the
//! freshly built result, which is what keeps repeated concatenation at
//! logarithmic depth overall.

use std::sync::Arc;

use super::ctor::{hnode, vnode};
use super::{Link, QuadRope};
use crate::fib::{fib, D_MAX};

fn is_hbalanced<T>(r: &QuadRope<T>) -> bool {
    let d = r.depth();
    d < D_MAX && fib(d + 2) <= r.cols() as u64
}

fn is_vbalanced<T>(r: &QuadRope<T>) -> bool {
    let d = r.depth();
    d < D_MAX && fib(d + 2) <= r.rows() as u64
}

/// Bottom-up collection of horizontally-adjacent spines: an `HCat` is split
/// into its children (recursively); any `VCat` found along the way is first
/// balanced along the *perpendicular* axis, then kept whole as a single
/// piece of the horizontal sequence.
fn collect_h<T>(r: Link<T>, out: &mut Vec<Link<T>>) {
    match Arc::try_unwrap(r) {
        Ok(QuadRope::HCat(c)) => {
            collect_h(c.left, out);
            collect_h(c.right, out);
        }
        Ok(other) => out.push(Arc::new(other)),
        Err(shared) => match &*shared {
            QuadRope::HCat(c) => {
                collect_h(c.left.clone(), out);
                collect_h(c.right.clone(), out);
            }
            _ => out.push(shared),
        },
    }
}

fn collect_v<T>(r: Link<T>, out: &mut Vec<Link<T>>) {
    match Arc::try_unwrap(r) {
        Ok(QuadRope::VCat(c)) => {
            collect_v(c.left, out);
            collect_v(c.right, out);
        }
        Ok(other) => out.push(Arc::new(other)),
        Err(shared) => match &*shared {
            QuadRope::VCat(c) => {
                collect_v(c.left.clone(), out);
                collect_v(c.right.clone(), out);
            }
            _ => out.push(shared),
        },
    }
}

/// Pairs adjacent elements left-to-right via `hnode`, halving the list each
/// pass, producing a tree of depth `ceil(log2(n))` for `n` input pieces.
fn rebuild_h<T>(mut pieces: Vec<Link<T>>) -> Link<T> {
    if pieces.is_empty() {
        return Arc::new(QuadRope::Empty);
    }
    while pieces.len() > 1 {
        let mut next = Vec::with_capacity((pieces.len() + 1) / 2);
        let mut it = pieces.into_iter();
        while let Some(a) = it.next() {
            match it.next() {
                Some(b) => next.push(hnode(a, b).expect("balancer preserves row agreement")),
                None => next.push(a),
            }
        }
        pieces = next;
    }
    pieces.pop().unwrap()
}

fn rebuild_v<T>(mut pieces: Vec<Link<T>>) -> Link<T> {
    if pieces.is_empty() {
        return Arc::new(QuadRope::Empty);
    }
    while pieces.len() > 1 {
        let mut next = Vec::with_capacity((pieces.len() + 1) / 2);
        let mut it = pieces.into_iter();
        while let Some(a) = it.next() {
            match it.next() {
                Some(b) => next.push(vnode(a, b).expect("balancer preserves column agreement")),
                None => next.push(a),
            }
        }
        pieces = next;
    }
    pieces.pop().unwrap()
}

/// Rebalances `r` along the horizontal axis if it isn't already balanced;
/// otherwise returns it unchanged. A `VCat` spine element is balanced along
/// its own (vertical) axis first, since it nests inside the horizontal
/// sequence as an opaque piece.
pub(crate) fn hbalance<T>(r: Link<T>) -> Link<T> {
    if is_hbalanced(&r) {
        return r;
    }
    let mut pieces = Vec::new();
    collect_h(r, &mut pieces);
    let pieces: Vec<Link<T>> =
        pieces.into_iter().map(|p| if matches!(&*p, QuadRope::VCat(_)) { vbalance(p) } else { p }).collect();
    rebuild_h(pieces)
}

/// Vertical counterpart of `hbalance`.
pub(crate) fn vbalance<T>(r: Link<T>) -> Link<T> {
    if is_vbalanced(&r) {
        return r;
    }
    let mut pieces = Vec::new();
    collect_v(r, &mut pieces);
    let pieces: Vec<Link<T>> =
        pieces.into_iter().map(|p| if matches!(&*p, QuadRope::HCat(_)) { hbalance(p) } else { p }).collect();
    rebuild_v(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::ctor::{hcat, leaf};
    use crate::tile::Tile;

    fn unit_leaf(v: i64) -> Link<i64> {
        leaf(Tile::from_owned(vec![v], 1, 1))
    }

    #[test]
    fn repeated_hcat_stays_logarithmic() {
        let mut r = unit_leaf(0);
        for i in 1..64 {
            r = hcat(r, unit_leaf(i)).unwrap();
        }
        assert_eq!(r.cols(), 64);
        // fib(d+2) <= 64 must hold for the balanced depth.
        let d = r.depth();
        assert!(fib(d + 2) <= 64);
        assert!(d < 16, "depth {} is not logarithmic in 64", d);
    }

    #[test]
    fn balance_preserves_row_major_content() {
        use crate::rope::materialize::to_flat_array;
        let mut r = unit_leaf(0);
        let mut expected = vec![0i64];
        for i in 1..40 {
            r = hcat(r, unit_leaf(i)).unwrap();
            expected.push(i);
        }
        assert_eq!(to_flat_array(&r), expected);
    }
}
