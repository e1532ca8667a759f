//! # **Construction** - building ropes from scratch
//!
//! `spec.md` §6: `empty`, `singleton`, `create`, `init`, `from_array_2d`,
//! `from_flat_array`. `init` is the general entry point others are
//! expressed in terms of: it recurses, always splitting the larger of the
//! two remaining edges, until both edges are within `S_MAX`, at which point
//! it builds one dense tile directly. Splitting through `hcat`/`vcat`
//! (rather than a raw `hnode`/`vnode`) means the result comes out already
//! Fibonacci-balanced.

use crate::error::{QuadRopeError, Result};
use crate::rope::ctor::{empty as rope_empty, leaf, sparse};
use crate::rope::{Link, S_MAX};
use crate::tile::Tile;

/// `empty()`: the unique empty rope.
pub fn empty<T>() -> Link<T> {
    rope_empty()
}

/// `singleton(v)`: a `1 x 1` rope holding `v`.
pub fn singleton<T>(v: T) -> Link<T> {
    leaf(Tile::from_owned(vec![v], 1, 1))
}

/// `create(h, w, v)`: an `h x w` rope of the constant `v`, stored as a
/// single `Sparse` node in O(1) space.
pub fn create<T>(h: usize, w: usize, v: T) -> Link<T> {
    sparse(h, w, v)
}

fn init_rec<T: Clone + PartialEq>(oi: usize, oj: usize, h: usize, w: usize, f: &mut impl FnMut(usize, usize) -> T) -> Result<Link<T>> {
    if h == 0 || w == 0 {
        return Ok(rope_empty());
    }
    if h <= S_MAX && w <= S_MAX {
        let mut data = Vec::with_capacity(h * w);
        for i in 0..h {
            for j in 0..w {
                data.push(f(oi + i, oj + j));
            }
        }
        return Ok(leaf(Tile::from_owned(data, h, w)));
    }
    if w >= h {
        let left_w = w / 2;
        let a = init_rec(oi, oj, h, left_w, f)?;
        let b = init_rec(oi, oj + left_w, h, w - left_w, f)?;
        crate::rope::ctor::hcat(a, b)
    } else {
        let top_h = h / 2;
        let a = init_rec(oi, oj, top_h, w, f)?;
        let b = init_rec(oi + top_h, oj, h - top_h, w, f)?;
        crate::rope::ctor::vcat(a, b)
    }
}

/// `init(h, w, f)`: the `h x w` rope whose cell `(i, j)` is `f(i, j)`.
pub fn init<T: Clone + PartialEq>(h: usize, w: usize, mut f: impl FnMut(usize, usize) -> T) -> Result<Link<T>> {
    init_rec(0, 0, h, w, &mut f)
}

/// `from_array_2d(a)`: builds a rope from a nested `Vec`, requiring every
/// row to share the same length.
pub fn from_array_2d<T: Clone + PartialEq>(a: &[Vec<T>]) -> Result<Link<T>> {
    let h = a.len();
    if h == 0 {
        return Ok(rope_empty());
    }
    let w = a[0].len();
    if a.iter().any(|row| row.len() != w) {
        return Err(QuadRopeError::InvalidArgument {
            message: "from_array_2d: all rows must share the same length".to_string(),
        });
    }
    if w == 0 {
        return Ok(rope_empty());
    }
    let mut flat = Vec::with_capacity(h * w);
    for row in a {
        flat.extend(row.iter().cloned());
    }
    init(h, w, |i, j| flat[i * w + j].clone())
}

/// `from_flat_array(vs, w)`: builds a rope from a row-major flat buffer of
/// width `w`; `InvalidArgument` if `vs.len()` isn't a multiple of `w`.
pub fn from_flat_array<T: Clone>(vs: Vec<T>, w: usize) -> Result<Link<T>> {
    if w == 0 {
        return if vs.is_empty() {
            Ok(rope_empty())
        } else {
            Err(QuadRopeError::InvalidArgument { message: "from_flat_array: width 0 with non-empty data".to_string() })
        };
    }
    if vs.len() % w != 0 {
        return Err(QuadRopeError::InvalidArgument {
            message: format!("from_flat_array: length {} is not a multiple of width {}", vs.len(), w),
        });
    }
    let h = vs.len() / w;
    Ok(leaf(Tile::from_owned(vs, h, w)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::materialize::to_flat_array;

    #[test]
    fn init_builds_positional_grid() {
        let r = init(3, 3, |i, j| (i * 10 + j) as i64).unwrap();
        assert_eq!(to_flat_array(&r), vec![0, 1, 2, 10, 11, 12, 20, 21, 22]);
    }

    #[test]
    fn init_beyond_s_max_still_correct() {
        let n = crate::rope::S_MAX * 3 + 1;
        let r = init(n, n, |i, j| (i + j) as i64).unwrap();
        assert_eq!(r.rows(), n);
        assert_eq!(r.cols(), n);
        assert_eq!(crate::rope::index::get(&r, n - 1, n - 1).unwrap(), (2 * (n - 1)) as i64);
    }

    #[test]
    fn from_flat_array_rejects_bad_width() {
        assert!(matches!(
            from_flat_array(vec![1, 2, 3], 2),
            Err(QuadRopeError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn from_array_2d_rejects_ragged_rows() {
        let a = vec![vec![1, 2], vec![3]];
        assert!(matches!(from_array_2d(&a), Err(QuadRopeError::InvalidArgument { .. })));
    }

    #[test]
    fn from_array_2d_round_trips() {
        let a = vec![vec![1i64, 2, 3], vec![4, 5, 6]];
        let r = from_array_2d(&a).unwrap();
        assert_eq!(to_flat_array(&r), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn create_is_sparse() {
        let r = create(4, 4, 9i64);
        assert!(r.is_sparse());
        assert_eq!(to_flat_array(&r), vec![9i64; 16]);
    }
}
