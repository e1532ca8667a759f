//! # **Numeric Module** - sparse-aware `f64` arithmetic
//!
//! `spec.md` §4.8: `sum`, `prod` (short-circuiting on a zero `Sparse`),
//! `identity`, `upper_diagonal`, `lower_diagonal`, `pointwise`. These are
//! the one place the crate commits to a concrete element type, since the
//! short-circuit rules are only meaningful for `0.0`/`1.0`.

use num_traits::{One, Zero};

use crate::error::Result;
use crate::rope::ctor::{hcat, sparse, vcat};
use crate::rope::materialize::window;
use crate::rope::{Link, QuadRope, S_MAX};

/// `sum(r)`: folds every element with `+`, starting from the additive
/// identity.
pub fn sum(r: &Link<f64>) -> f64 {
    crate::rope::reduce_scan::reduce(r, &f64::zero(), &mut |acc, v| acc + v)
}

/// `prod(r)`: folds every element with `*`. Any `Sparse(_, _, 0.0)`
/// encountered, or any cat whose left operand reduces to `0.0`, returns
/// `0.0` immediately without evaluating the sibling; `Sparse(_, _, 1.0)`
/// contributes nothing.
pub fn prod(r: &Link<f64>) -> f64 {
    match &**r {
        QuadRope::Empty => f64::one(),
        QuadRope::Leaf(t) => t.iter().fold(f64::one(), |acc, v| acc * v),
        QuadRope::Sparse(s) => {
            if s.v.is_zero() {
                f64::zero()
            } else if s.v.is_one() {
                f64::one()
            } else {
                s.v.powi((s.h * s.w) as i32)
            }
        }
        QuadRope::Slice(s) => prod(&window(s.i, s.j, s.h, s.w, &s.inner)),
        QuadRope::HCat(c) | QuadRope::VCat(c) => {
            let left = prod(&c.left);
            if left.is_zero() {
                f64::zero()
            } else {
                left * prod(&c.right)
            }
        }
    }
}

fn identity_rec(n: usize) -> Result<Link<f64>> {
    if n == 0 {
        return Ok(crate::rope::ctor::empty());
    }
    if n <= S_MAX {
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(if i == j { f64::one() } else { f64::zero() });
            }
        }
        return Ok(crate::rope::ctor::leaf(crate::tile::Tile::from_owned(data, n, n)));
    }
    let n1 = n / 2;
    let n2 = n - n1;
    let nw = identity_rec(n1)?;
    let se = identity_rec(n2)?;
    let ne = sparse(n1, n2, f64::zero());
    let sw = sparse(n2, n1, f64::zero());
    let top = hcat(nw, ne)?;
    let bottom = hcat(sw, se)?;
    vcat(top, bottom)
}

/// `identity(n)`: the `n x n` identity matrix, built by recursive quadrant
/// decomposition; off-diagonal quadrants are `Sparse(_, _, 0.0)`, diagonal
/// quadrants recurse, and the base case (`n <= s_max`) emits a dense leaf.
pub fn identity(n: usize) -> Result<Link<f64>> {
    identity_rec(n)
}

fn triangle_base(n: usize, v: f64, upper: bool) -> Link<f64> {
    let mut data = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let in_region = if upper { i <= j } else { i >= j };
            data.push(if in_region { v } else { 0.0 });
        }
    }
    crate::rope::ctor::leaf(crate::tile::Tile::from_owned(data, n, n))
}

fn upper_diagonal_rec(n: usize, v: f64) -> Result<Link<f64>> {
    if n == 0 {
        return Ok(crate::rope::ctor::empty());
    }
    if n <= S_MAX {
        return Ok(triangle_base(n, v, true));
    }
    let n1 = n / 2;
    let n2 = n - n1;
    // NE quadrant (rows [0,n1), cols [n1,n)) has every row index < every
    // column index, so it's entirely in the upper triangle.
    let nw = upper_diagonal_rec(n1, v)?;
    let ne = sparse(n1, n2, v);
    let sw = sparse(n2, n1, 0.0);
    let se = upper_diagonal_rec(n2, v)?;
    let top = hcat(nw, ne)?;
    let bottom = hcat(sw, se)?;
    vcat(top, bottom)
}

/// `upper_diagonal(n, v)`: the `n x n` matrix with `v` on and above the
/// diagonal, `0.0` below.
pub fn upper_diagonal(n: usize, v: f64) -> Result<Link<f64>> {
    upper_diagonal_rec(n, v)
}

fn lower_diagonal_rec(n: usize, v: f64) -> Result<Link<f64>> {
    if n == 0 {
        return Ok(crate::rope::ctor::empty());
    }
    if n <= S_MAX {
        return Ok(triangle_base(n, v, false));
    }
    let n1 = n / 2;
    let n2 = n - n1;
    let nw = lower_diagonal_rec(n1, v)?;
    let ne = sparse(n1, n2, 0.0);
    let sw = sparse(n2, n1, v);
    let se = lower_diagonal_rec(n2, v)?;
    let top = hcat(nw, ne)?;
    let bottom = hcat(sw, se)?;
    vcat(top, bottom)
}

/// `lower_diagonal(n, v)`: symmetric to [`upper_diagonal`], `v` on and
/// below the diagonal.
pub fn lower_diagonal(n: usize, v: f64) -> Result<Link<f64>> {
    lower_diagonal_rec(n, v)
}

/// `pointwise(a, b)`: element-wise multiplication specialized so a zero
/// `Sparse` absorbs its sibling without evaluating it, and a one `Sparse`
/// passes its sibling through unchanged. Falls back to a general
/// multiplying `zip` otherwise.
pub fn pointwise(a: &Link<f64>, b: &Link<f64>) -> Result<Link<f64>> {
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return Err(crate::error::QuadRopeError::ShapeMismatch {
            context: "pointwise",
            left: (a.rows(), a.cols()),
            right: (b.rows(), b.cols()),
        });
    }
    if let QuadRope::Sparse(s) = &**a {
        if s.v.is_zero() {
            return Ok(sparse(s.h, s.w, f64::zero()));
        }
        if s.v.is_one() {
            return Ok(b.clone());
        }
    }
    if let QuadRope::Sparse(s) = &**b {
        if s.v.is_zero() {
            return Ok(sparse(s.h, s.w, f64::zero()));
        }
        if s.v.is_one() {
            return Ok(a.clone());
        }
    }
    crate::rope::map_zip::zip(a, b, &mut |x, y| x * y)
}
