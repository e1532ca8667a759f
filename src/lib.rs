//! # quadrope
//!
//! A persistent, immutable two-dimensional sequence — a *quad rope* — built
//! from the same structural-sharing discipline as a 1-D rope, generalized to
//! two axes. Every operation returns a new rope; no operation mutates an
//! existing one. Interior nodes split horizontally (`HCat`) or vertically
//! (`VCat`) over Fibonacci-bounded edge lengths, `Slice` gives a lazy window
//! without copying, and `Sparse` stores a constant rectangle in O(1) space
//! regardless of its logical size.
//!
//! The crate is organized in layers, innermost first: [`tile`] (dense
//! rectangular storage), [`target`] (mutable scratch buffers used only
//! inside a single bulk operation), `rope` (the tree itself and every
//! structural/bulk operation over it, private — its functions are
//! re-exported here), [`numeric`] (sparse-aware `f64` arithmetic), and
//! [`parallel`] (the fork-join overlay, a thin layer over the same
//! sequential functions).
//!
//! Everything below is a thin `pub use` of the `rope` submodules' functions,
//! so the public surface reads as one flat namespace even though the
//! implementation is split by concern.

mod construct;
mod error;
mod fib;
mod numeric;
mod parallel;
mod rope;
mod target;
mod tile;

pub use error::{QuadRopeError, Result};

pub use construct::{create, empty, from_array_2d, from_flat_array, init, singleton};

/// The quad rope type itself, re-exported at the crate root so callers
/// write `quadrope::QuadRope<T>` rather than reaching into a submodule.
pub use rope::QuadRope;

/// Leaf edge-length bound (`spec.md` §3): `32` in release, `4` in debug.
pub use rope::S_MAX;

pub use fib::D_MAX;

/// Shared handle to a rope, returned and accepted throughout the public
/// API. Cloning a `Link` is a refcount bump, never a copy of the rope's
/// contents.
pub type Link<T> = std::sync::Arc<QuadRope<T>>;

/// `rows(r)`: number of rows.
pub fn rows<T>(r: &Link<T>) -> usize {
    r.rows()
}

/// `cols(r)`: number of columns.
pub fn cols<T>(r: &Link<T>) -> usize {
    r.cols()
}

/// `depth(r)`: tree depth (`0` for a leaf, sparse block, or empty rope).
pub fn depth<T>(r: &Link<T>) -> usize {
    r.depth()
}

/// `is_empty(r)`: true iff `r` has a zero edge.
pub fn is_empty<T>(r: &Link<T>) -> bool {
    r.is_empty()
}

/// `is_singleton(r)`: true iff `r` is exactly `1 x 1`.
pub fn is_singleton<T>(r: &Link<T>) -> bool {
    r.is_singleton()
}

/// `is_sparse(r)`: true iff `r` is, or contains, a `Sparse` region.
pub fn is_sparse<T>(r: &Link<T>) -> bool {
    r.is_sparse()
}

/// `get(r, i, j)`: the element at `(i, j)`, or `OutOfBounds`.
pub fn get<T: Clone>(r: &Link<T>, i: usize, j: usize) -> Result<T> {
    rope::index::get(r, i, j)
}

/// `set(r, i, j, v)`: a copy of `r` with `(i, j)` replaced by `v`.
pub fn set<T: Clone>(r: &Link<T>, i: usize, j: usize, v: T) -> Result<Link<T>> {
    rope::index::set(r, i, j, v)
}

/// `row(r, i)`: the flat contents of row `i`.
pub fn row<T: Clone>(r: &Link<T>, i: usize) -> Vec<T> {
    rope::materialize::row(r, i)
}

/// `col(r, j)`: the flat contents of column `j`.
pub fn col<T: Clone>(r: &Link<T>, j: usize) -> Vec<T> {
    rope::materialize::col(r, j)
}

/// `to_rows(r)`: every row as a `Vec<T>`, top to bottom.
pub fn to_rows<T: Clone>(r: &Link<T>) -> Vec<Vec<T>> {
    rope::materialize::to_rows(r)
}

/// `to_cols(r)`: every column as a `Vec<T>`, left to right.
pub fn to_cols<T: Clone>(r: &Link<T>) -> Vec<Vec<T>> {
    rope::materialize::to_cols(r)
}

/// `to_array_2d(r)`: nested-`Vec` view of `r`, row-major.
pub fn to_array_2d<T: Clone>(r: &Link<T>) -> Vec<Vec<T>> {
    rope::materialize::to_array_2d(r)
}

/// `to_flat_array(r)`: row-major flat contents of `r`.
pub fn to_flat_array<T: Clone>(r: &Link<T>) -> Vec<T> {
    rope::materialize::to_flat_array(r)
}

/// `slice(r, i, j, h, w)`: the (clamped) window `[i..i+h) x [j..j+w)` of
/// `r`, resolved lazily until something forces it.
pub fn slice<T: Clone>(r: &Link<T>, i: usize, j: usize, h: usize, w: usize) -> Link<T> {
    rope::structure::slice(r, i, j, h, w)
}

/// `hslice(r, j, w)`: the column window `[j..j+w)`, all rows.
pub fn hslice<T: Clone>(r: &Link<T>, j: usize, w: usize) -> Link<T> {
    rope::structure::hslice(r, j, w)
}

/// `vslice(r, i, h)`: the row window `[i..i+h)`, all columns.
pub fn vslice<T: Clone>(r: &Link<T>, i: usize, h: usize) -> Link<T> {
    rope::structure::vslice(r, i, h)
}

/// `hsplit2(r)`: `r` split into its left and right halves.
pub fn hsplit2<T: Clone>(r: &Link<T>) -> (Link<T>, Link<T>) {
    rope::structure::hsplit2(r)
}

/// `vsplit2(r)`: `r` split into its top and bottom halves.
pub fn vsplit2<T: Clone>(r: &Link<T>) -> (Link<T>, Link<T>) {
    rope::structure::vsplit2(r)
}

/// `split4(r)`: `r` split into its four quadrants, `(nw, ne, sw, se)`.
pub fn split4<T: Clone>(r: &Link<T>) -> (Link<T>, Link<T>, Link<T>, Link<T>) {
    rope::structure::split4(r)
}

/// `hcat(a, b)`: horizontal concatenation, `a` left of `b`. `ShapeMismatch`
/// if `rows(a) != rows(b)`.
pub fn hcat<T: Clone + PartialEq>(a: Link<T>, b: Link<T>) -> Result<Link<T>> {
    rope::ctor::hcat(a, b)
}

/// `vcat(a, b)`: vertical concatenation, `a` above `b`. `ShapeMismatch` if
/// `cols(a) != cols(b)`.
pub fn vcat<T: Clone + PartialEq>(a: Link<T>, b: Link<T>) -> Result<Link<T>> {
    rope::ctor::vcat(a, b)
}

/// `hrev(r)`: `r` mirrored left-to-right.
pub fn hrev<T: Clone>(r: &Link<T>) -> Link<T> {
    rope::revtranspose::hrev(r)
}

/// `vrev(r)`: `r` mirrored top-to-bottom.
pub fn vrev<T: Clone>(r: &Link<T>) -> Link<T> {
    rope::revtranspose::vrev(r)
}

/// `transpose(r)`: `r` with rows and columns swapped.
pub fn transpose<T: Clone>(r: &Link<T>) -> Link<T> {
    rope::revtranspose::transpose(r)
}

/// `materialize(r)`: `r` with every `Slice` resolved into real structure.
pub fn materialize<T: Clone>(r: &Link<T>) -> Link<T> {
    rope::materialize::materialize(r)
}

/// `reallocate(r)`: `r` flattened into a single contiguous dense leaf.
pub fn reallocate<T: Clone>(r: &Link<T>) -> Link<T> {
    rope::structure::reallocate(r)
}

/// `compress(r)`: the inverse of `reallocate` — maximal constant regions of
/// `r` replaced by `Sparse` nodes, values unchanged.
pub fn compress<T: Clone + PartialEq>(r: &Link<T>) -> Link<T> {
    rope::structure::compress(r)
}

/// `map(f, r)`: `r` with every element replaced by `f(element)`.
pub fn map<T, U>(r: &Link<T>, mut f: impl FnMut(&T) -> U) -> Link<U> {
    rope::map_zip::map(r, &mut f)
}

/// `zip(f, a, b)`: element-wise combination of `a` and `b`. `ShapeMismatch`
/// if their shapes disagree.
pub fn zip<T: Clone, U: Clone, V>(a: &Link<T>, b: &Link<U>, mut f: impl FnMut(&T, &U) -> V) -> Result<Link<V>> {
    rope::map_zip::zip(a, b, &mut f)
}

/// `hmap(f, r)`: `map`, but `f` additionally sees each element's absolute
/// `(row, col)` position.
pub fn hmap<T, U>(r: &Link<T>, mut f: impl FnMut(usize, usize, &T) -> U) -> Link<U> {
    rope::map_zip::hmap(r, 0, 0, &mut f)
}

/// `vmap(f, r)`: positional map, symmetric to [`hmap`] (the two coincide —
/// position is tracked on both axes regardless of traversal order).
pub fn vmap<T, U>(r: &Link<T>, mut f: impl FnMut(usize, usize, &T) -> U) -> Link<U> {
    rope::map_zip::vmap(r, 0, 0, &mut f)
}

/// `reduce(plus, init, r)`: folds every element of `r` with `plus`.
pub fn reduce<T: Clone>(r: &Link<T>, init: &T, mut plus: impl FnMut(T, &T) -> T) -> T {
    rope::reduce_scan::reduce(r, init, &mut plus)
}

/// `hreduce`: alias of [`reduce`] (no row-local variant — a rope has no
/// "rows" independent of being folded as a whole).
pub fn hreduce<T: Clone>(r: &Link<T>, init: &T, mut plus: impl FnMut(T, &T) -> T) -> T {
    rope::reduce_scan::hreduce(r, init, &mut plus)
}

/// `vreduce`: alias of [`reduce`], symmetric to [`hreduce`].
pub fn vreduce<T: Clone>(r: &Link<T>, init: &T, mut plus: impl FnMut(T, &T) -> T) -> T {
    rope::reduce_scan::vreduce(r, init, &mut plus)
}

/// `mapreduce(f, plus, init, r)`: a `map` fused with a `reduce`.
pub fn mapreduce<T, U: Clone>(r: &Link<T>, mut f: impl FnMut(&T) -> U, init: &U, mut plus: impl FnMut(U, &U) -> U) -> U {
    rope::reduce_scan::mapreduce(r, &mut f, init, &mut plus)
}

/// `scan(plus, minus, init, r)`: the 2-D prefix fold (summed-area table).
/// `init(i, j)` is the boundary function, supplying the value the
/// recurrence reads at virtual position `(i, j)` for any `i < 0` or
/// `j < 0` — not a scalar fold seed, evaluated only at a cell's
/// out-of-range neighbors, never folded into interior cells.
pub fn scan<T: Clone>(
    r: &Link<T>,
    init: impl Fn(i64, i64) -> T,
    mut plus: impl FnMut(&T, &T) -> T,
    mut minus: impl FnMut(&T, &T) -> T,
) -> Link<T> {
    rope::reduce_scan::scan(r, &init, &mut plus, &mut minus)
}

/// `hscan(plus, init, r)`: row-local prefix fold, one independent scan per
/// row. `init(i)` is row `i`'s boundary prefix, evaluated once per row.
pub fn hscan<T: Clone>(r: &Link<T>, init: impl Fn(usize) -> T, mut plus: impl FnMut(&T, &T) -> T) -> Link<T> {
    rope::reduce_scan::hscan(r, init, &mut plus)
}

/// `vscan(plus, init, r)`: column-local prefix fold, symmetric to [`hscan`].
pub fn vscan<T: Clone>(r: &Link<T>, init: impl Fn(usize) -> T, mut plus: impl FnMut(&T, &T) -> T) -> Link<T> {
    rope::reduce_scan::vscan(r, init, &mut plus)
}

/// `hfilter(p, r)`: `r` must be a single row; drops the cells where `p` is
/// false, keeping left-to-right order. `ShapeMismatch` if `rows(r) != 1`.
pub fn hfilter<T: Clone>(r: &Link<T>, mut p: impl FnMut(&T) -> bool) -> Result<Link<T>> {
    rope::filter::hfilter(r, &mut p)
}

/// `vfilter(p, r)`: column-axis symmetric counterpart of [`hfilter`];
/// `ShapeMismatch` if `cols(r) != 1`.
pub fn vfilter<T: Clone>(r: &Link<T>, mut p: impl FnMut(&T) -> bool) -> Result<Link<T>> {
    rope::filter::vfilter(r, &mut p)
}

/// `forall(p, r)`: true iff every element of `r` satisfies `p`.
pub fn forall<T>(r: &Link<T>, mut p: impl FnMut(&T) -> bool) -> bool {
    rope::map_zip::forall(r, &mut p)
}

/// `exists(p, r)`: true iff some element of `r` satisfies `p`.
pub fn exists<T>(r: &Link<T>, mut p: impl FnMut(&T) -> bool) -> bool {
    rope::map_zip::exists(r, &mut p)
}

/// `equals(a, b)`: true iff `a` and `b` have the same shape and contents.
pub fn equals<T: Clone + PartialEq>(a: &Link<T>, b: &Link<T>) -> bool {
    rope::map_zip::equals(a, b)
}

/// Row-major, read-only iteration over `r`'s contents without forcing
/// [`to_flat_array`]'s allocation.
pub fn iter_row_major<T: Clone>(r: &Link<T>) -> impl Iterator<Item = T> + '_ {
    (0..r.rows()).flat_map(move |i| row(r, i).into_iter())
}

pub use numeric::{identity, lower_diagonal, pointwise, prod, sum, upper_diagonal};

pub use parallel::{
    map_until, par2, par4, par_hfilter, par_hrev, par_init, par_map, par_mapreduce, par_reduce,
    par_transpose, par_vfilter, par_vrev, par_zip, Progress,
};

/// `par_hmapreduce`/`par_vmapreduce`: aliases of [`par_mapreduce`], named to
/// match `spec.md` §6's listed parallel-variant surface.
pub fn par_hmapreduce<T: Send + Sync, U: Clone + Send + Sync>(
    r: &Link<T>,
    f: impl Fn(&T) -> U + Sync,
    init: &U,
    plus: impl Fn(U, &U) -> U + Sync,
) -> U {
    parallel::par_mapreduce(r, &f, init, &plus)
}

pub fn par_vmapreduce<T: Send + Sync, U: Clone + Send + Sync>(
    r: &Link<T>,
    f: impl Fn(&T) -> U + Sync,
    init: &U,
    plus: impl Fn(U, &U) -> U + Sync,
) -> U {
    parallel::par_mapreduce(r, &f, init, &plus)
}

/// `par_hreduce`/`par_vreduce`: aliases of [`par_reduce`].
pub fn par_hreduce<T: Clone + Send + Sync>(r: &Link<T>, init: &T, plus: impl Fn(T, &T) -> T + Sync) -> T {
    parallel::par_hreduce(r, init, &plus)
}

pub fn par_vreduce<T: Clone + Send + Sync>(r: &Link<T>, init: &T, plus: impl Fn(T, &T) -> T + Sync) -> T {
    parallel::par_vreduce(r, init, &plus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_round_trip() {
        let r = init(3, 3, |i, j| (i * 10 + j) as i64).unwrap();
        assert_eq!(rows(&r), 3);
        assert_eq!(cols(&r), 3);
        assert_eq!(get(&r, 1, 2).unwrap(), 12);
        let r2 = set(&r, 1, 2, 99).unwrap();
        assert_eq!(get(&r2, 1, 2).unwrap(), 99);
        assert_eq!(get(&r, 1, 2).unwrap(), 12);
        assert_eq!(to_flat_array(&r), vec![0, 1, 2, 10, 11, 12, 20, 21, 22]);
    }

    #[test]
    fn public_api_cat_and_filter() {
        let a = from_flat_array(vec![1, 2, 3], 3).unwrap();
        let b = from_flat_array(vec![4, 5, 6], 3).unwrap();
        let cat = hcat(a, b).unwrap();
        assert_eq!(rows(&cat), 2);
        assert_eq!(cols(&cat), 3);
        let top_row = vslice(&cat, 0, 1);
        let kept = hfilter(&top_row, |v| *v % 2 == 0).unwrap();
        assert_eq!(to_flat_array(&kept), vec![2]);
    }

    #[test]
    fn public_api_numeric_and_parallel_agree() {
        let r = identity(5).unwrap();
        assert_eq!(sum(&r), 5.0);
        let a = init(6, 6, |i, j| (i + j) as i64).unwrap();
        let seq = reduce(&a, &0i64, |acc, v| acc + v);
        let par = par_reduce(&a, &0i64, |acc, v| acc + v);
        assert_eq!(seq, par);
    }

    #[test]
    fn iter_row_major_matches_to_flat_array() {
        let r = init(2, 3, |i, j| (i * 10 + j) as i64).unwrap();
        let via_iter: Vec<i64> = iter_row_major(&r).collect();
        assert_eq!(via_iter, to_flat_array(&r));
    }
}
