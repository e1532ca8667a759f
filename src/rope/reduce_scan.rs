//! # **Reduce / Scan Module**
//!
//! `spec.md` §4.7: `reduce` folds all elements with an associative `plus`
//! (any order, since the shape of the tree determines association but not
//! element order within a leaf); `scan` computes the summed-area prefix
//! table via the standard inclusion-exclusion recurrence, needing both
//! `plus` and its inverse `minus`.

use super::ctor::leaf;
use super::materialize::{to_flat_array, window};
use super::{Link, QuadRope};

/// `reduce(plus, init, r)`: folds every element of `r` into one accumulator.
/// `Sparse(h, w, v)` folds `v` into the accumulator `h * w` times (per
/// `spec.md` §4.7 the sparse constant still participates once per logical
/// cell, only its *storage* is O(1)).
pub(crate) fn reduce<T: Clone>(r: &Link<T>, init: &T, plus: &mut impl FnMut(T, &T) -> T) -> T {
    match &**r {
        QuadRope::Empty => init.clone(),
        QuadRope::Leaf(t) => t.reduce(init, plus),
        QuadRope::Sparse(s) => {
            let mut acc = init.clone();
            for _ in 0..(s.h * s.w) {
                acc = plus(acc, &s.v);
            }
            acc
        }
        QuadRope::Slice(s) => {
            let resolved = window(s.i, s.j, s.h, s.w, &s.inner);
            reduce(&resolved, init, plus)
        }
        QuadRope::HCat(c) | QuadRope::VCat(c) => {
            let left = reduce(&c.left, init, plus);
            reduce(&c.right, &left, plus)
        }
    }
}

pub(crate) fn hreduce<T: Clone>(r: &Link<T>, init: &T, plus: &mut impl FnMut(T, &T) -> T) -> T {
    reduce(r, init, plus)
}

pub(crate) fn vreduce<T: Clone>(r: &Link<T>, init: &T, plus: &mut impl FnMut(T, &T) -> T) -> T {
    reduce(r, init, plus)
}

/// `mapreduce(f, plus, init, r)`: fuses a map with a reduce so the mapped
/// intermediate is never materialized.
pub(crate) fn mapreduce<T, U: Clone>(
    r: &Link<T>,
    f: &mut impl FnMut(&T) -> U,
    init: &U,
    plus: &mut impl FnMut(U, &U) -> U,
) -> U {
    match &**r {
        QuadRope::Empty => init.clone(),
        QuadRope::Leaf(t) => {
            let mut acc = init.clone();
            for v in t.iter() {
                acc = plus(acc, &f(v));
            }
            acc
        }
        QuadRope::Sparse(s) => {
            let mapped = f(&s.v);
            let mut acc = init.clone();
            for _ in 0..(s.h * s.w) {
                acc = plus(acc, &mapped);
            }
            acc
        }
        QuadRope::Slice(s) => {
            let resolved = window(s.i, s.j, s.h, s.w, &s.inner);
            mapreduce(&resolved, f, init, plus)
        }
        QuadRope::HCat(c) | QuadRope::VCat(c) => {
            let left = mapreduce(&c.left, f, init, plus);
            mapreduce(&c.right, f, &left, plus)
        }
    }
}

/// `scan(plus, minus, init, r)`: the 2-D prefix sum, where cell `(i, j)` of
/// the result holds the fold of every cell in `r` with row `<= i` and
/// column `<= j`. Implemented via the summed-area recurrence
/// `S(i,j) = S(i-1,j) + S(i,j-1) - S(i-1,j-1) + r(i,j)`, so `minus` must
/// undo `plus` (true for any abelian group, e.g. numeric addition).
///
/// `init` is the boundary function from `spec.md` §4.7/property 10, not a
/// scalar fold seed: `init(i, j)` supplies the value the recurrence would
/// read at virtual position `(i, j)` were it in range, for any `i < 0` or
/// `j < 0`. It is evaluated only at the three boundary terms of a cell
/// `(i, j)` that fall outside the table (`init(-1, j)` standing in for the
/// row above the top, `init(i, -1)` for the column left of the left edge,
/// and `init(i - 1, j - 1)` for the shared corner of both), never folded
/// into interior cells.
pub(crate) fn scan<T: Clone>(
    r: &Link<T>,
    init: &impl Fn(i64, i64) -> T,
    plus: &mut impl FnMut(&T, &T) -> T,
    minus: &mut impl FnMut(&T, &T) -> T,
) -> Link<T> {
    let rows = r.rows();
    let cols = r.cols();
    if rows == 0 || cols == 0 {
        return std::sync::Arc::new(QuadRope::Empty);
    }
    let flat = to_flat_array(r);
    let mut table: Vec<T> = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            let up = if i > 0 { table[(i - 1) * cols + j].clone() } else { init(-1, j as i64) };
            let left = if j > 0 { table[i * cols + j - 1].clone() } else { init(i as i64, -1) };
            let diag = if i > 0 && j > 0 {
                table[(i - 1) * cols + j - 1].clone()
            } else {
                init(i as i64 - 1, j as i64 - 1)
            };
            let mut acc = plus(&flat[i * cols + j], &up);
            acc = plus(&acc, &left);
            acc = minus(&acc, &diag);
            table.push(acc);
        }
    }
    leaf(crate::tile::Tile::from_owned(table, rows, cols))
}

/// `hscan(plus, init, r)`: row-local prefix sum, one independent scan per
/// row, with no cross-row accumulation. `init(i)` is the boundary prefix
/// for row `i`, evaluated once per row rather than folded into every cell;
/// materializes `r` into a `Tile` and delegates to [`crate::tile::Tile::hscan`],
/// which already implements this recurrence at the tile layer.
pub(crate) fn hscan<T: Clone>(r: &Link<T>, init: impl Fn(usize) -> T, plus: &mut impl FnMut(&T, &T) -> T) -> Link<T> {
    let rows = r.rows();
    let cols = r.cols();
    if rows == 0 || cols == 0 {
        return std::sync::Arc::new(QuadRope::Empty);
    }
    let flat = to_flat_array(r);
    let tile = crate::tile::Tile::from_owned(flat, rows, cols);
    leaf(tile.hscan(init, plus))
}

/// `vscan(plus, init, r)`: column-local prefix sum, symmetric to `hscan`,
/// delegating to [`crate::tile::Tile::vscan`].
pub(crate) fn vscan<T: Clone>(r: &Link<T>, init: impl Fn(usize) -> T, plus: &mut impl FnMut(&T, &T) -> T) -> Link<T> {
    let rows = r.rows();
    let cols = r.cols();
    if rows == 0 || cols == 0 {
        return std::sync::Arc::new(QuadRope::Empty);
    }
    let flat = to_flat_array(r);
    let tile = crate::tile::Tile::from_owned(flat, rows, cols);
    leaf(tile.vscan(init, plus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::ctor::{leaf as leaf_ctor, sparse as sparse_ctor};
    use crate::tile::Tile;

    fn grid(h: usize, w: usize) -> Link<i64> {
        let data: Vec<i64> = (0..(h * w) as i64).collect();
        leaf_ctor(Tile::from_owned(data, h, w))
    }

    #[test]
    fn reduce_sums_all_elements() {
        let r = grid(2, 3);
        let total = reduce(&r, &0i64, &mut |acc, v| acc + v);
        assert_eq!(total, 15);
    }

    #[test]
    fn reduce_over_sparse_counts_each_cell() {
        let s = sparse_ctor(3, 4, 2i64);
        let total = reduce(&s, &0i64, &mut |acc, v| acc + v);
        assert_eq!(total, 2 * 12);
    }

    #[test]
    fn mapreduce_fuses_map_and_sum() {
        let r = grid(2, 2);
        let total = mapreduce(&r, &mut |v| v * v, &0i64, &mut |acc, v| acc + v);
        assert_eq!(total, 0 + 1 + 4 + 9);
    }

    #[test]
    fn scan_is_2d_prefix_sum() {
        let r = grid(2, 2);
        let s = scan(&r, &|_, _| 0i64, &mut |a, b| a + b, &mut |a, b| a - b);
        assert_eq!(to_flat_array(&s), vec![0, 1, 2, 6]);
    }

    #[test]
    fn hscan_is_row_local() {
        let r = grid(2, 3);
        let s = hscan(&r, |_| 0i64, &mut |a, b| a + b);
        assert_eq!(to_flat_array(&s), vec![0, 1, 3, 3, 7, 12]);
    }

    #[test]
    fn vscan_is_column_local() {
        let r = grid(3, 2);
        let s = vscan(&r, |_| 0i64, &mut |a, b| a + b);
        assert_eq!(to_flat_array(&s), vec![0, 1, 2, 4, 6, 9]);
    }

    #[test]
    fn scan_applies_nonidentity_init_only_at_the_boundary() {
        // A constant grid of `v` scanned with a non-identity boundary `c`
        // must land at `out[i,j] = (i+1)*(j+1)*v + c`, per the
        // inclusion-exclusion recurrence with `out[-1,*] = out[*,-1] = c`.
        // Folding `c` into every cell (the bug this guards against) instead
        // produces `2c + 2v` and `4c + 4v` at `(0,1)` and `(1,1)`.
        let v = 3i64;
        let c = 10i64;
        let r = leaf_ctor(Tile::from_owned(vec![v; 2 * 2], 2, 2));
        let s = scan(&r, &|_, _| c, &mut |a, b| a + b, &mut |a, b| a - b);
        let flat = to_flat_array(&s);
        assert_eq!(flat, vec![v + c, 2 * v + c, 2 * v + c, 4 * v + c]);
    }

    #[test]
    fn hscan_boundary_is_index_dependent() {
        let r = grid(2, 3);
        let s = hscan(&r, |i| i as i64 * 10, &mut |a, b| a + b);
        // row 0: boundary 0, running sums 0,1,3; row 1: boundary 10, sums 13,17,22
        assert_eq!(to_flat_array(&s), vec![0, 1, 3, 13, 17, 22]);
    }
}
