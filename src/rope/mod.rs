//! # **Rope Module** - the quad rope tree and its shape
//!
//! `QuadRope<T>` is the tagged five-variant tree of `spec.md` §3: `Empty`,
//! `Leaf`, `HCat`, `VCat`, `Slice`, `Sparse`. The variants are private —
//! [`crate::rope::ctor`]'s pseudo-constructors are the only way to build
//! interior nodes, so every invariant in `spec.md` §3 holds by construction
//! rather than by convention.

pub(crate) mod balance;
pub(crate) mod ctor;
pub(crate) mod filter;
pub(crate) mod index;
pub(crate) mod map_zip;
pub(crate) mod materialize;
pub(crate) mod reduce_scan;
pub(crate) mod revtranspose;
pub(crate) mod structure;

use std::fmt;
use std::sync::Arc;

use crate::tile::Tile;

/// Shared handle to a child subtree. Always `Arc`, even in builds without
/// the `parallel` feature: a single representation keeps the sequential and
/// parallel code paths identical everywhere above this module, and the
/// atomic refcount overhead is negligible next to the tree-shaped work
/// these operations already do.
pub(crate) type Link<T> = Arc<QuadRope<T>>;

/// Leaf edge-length bound. Release favours fewer, bigger allocations;
/// debug favours shallow, easy-to-inspect trees (matches `spec.md` §3).
#[cfg(not(debug_assertions))]
pub const S_MAX: usize = 32;
#[cfg(debug_assertions)]
pub const S_MAX: usize = 4;

pub(crate) struct Cat<T> {
    pub depth: usize,
    pub rows: usize,
    pub cols: usize,
    pub sparse: bool,
    pub left: Link<T>,
    pub right: Link<T>,
}

pub(crate) struct SliceNode<T> {
    pub i: usize,
    pub j: usize,
    pub h: usize,
    pub w: usize,
    pub inner: Link<T>,
}

pub(crate) struct SparseNode<T> {
    pub h: usize,
    pub w: usize,
    pub v: T,
}

/// The quad rope itself. See the module docs and `spec.md` §3 for the
/// invariants every value of this type upholds.
pub enum QuadRope<T> {
    Empty,
    Leaf(Tile<T>),
    HCat(Cat<T>),
    VCat(Cat<T>),
    Slice(SliceNode<T>),
    Sparse(SparseNode<T>),
}

impl<T> QuadRope<T> {
    /// Number of rows of this rectangle.
    pub fn rows(&self) -> usize {
        match self {
            QuadRope::Empty => 0,
            QuadRope::Leaf(t) => t.rows(),
            QuadRope::HCat(c) | QuadRope::VCat(c) => c.rows,
            QuadRope::Slice(s) => s.h,
            QuadRope::Sparse(s) => s.h,
        }
    }

    /// Number of columns of this rectangle.
    pub fn cols(&self) -> usize {
        match self {
            QuadRope::Empty => 0,
            QuadRope::Leaf(t) => t.cols(),
            QuadRope::HCat(c) | QuadRope::VCat(c) => c.cols,
            QuadRope::Slice(s) => s.w,
            QuadRope::Sparse(s) => s.w,
        }
    }

    /// Tree depth: `0` for `Empty`/`Leaf`/`Sparse`, `1 + max` of children
    /// for cats. `Slice` reports its inner rope's depth (it adds no
    /// branching of its own).
    pub fn depth(&self) -> usize {
        match self {
            QuadRope::Empty | QuadRope::Leaf(_) | QuadRope::Sparse(_) => 0,
            QuadRope::HCat(c) | QuadRope::VCat(c) => c.depth,
            QuadRope::Slice(s) => s.inner.depth(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    pub fn is_singleton(&self) -> bool {
        self.rows() == 1 && self.cols() == 1
    }

    /// Whether this node (or, for a cat, any descendant) is a `Sparse`
    /// region. `Slice` answers conservatively `false`: a slice may cut a
    /// sparse region down to something still sparse, or straddle a
    /// boundary that isn't — callers that care route through `materialize`
    /// first, which always resolves slices before inspecting sparsity.
    pub fn is_sparse(&self) -> bool {
        match self {
            QuadRope::Sparse(_) => true,
            QuadRope::HCat(c) | QuadRope::VCat(c) => c.sparse,
            _ => false,
        }
    }

    /// True if no `Leaf` occurs anywhere below this node (through `Slice`,
    /// conservatively: a slice of a fully-sparse rope is fully sparse too,
    /// since `Sparse` reslicing never needs a dense tile). Bulk operations
    /// use this to skip target allocation entirely on wholly-sparse inputs,
    /// per `spec.md` §4.6 ("target is created lazily ... so that
    /// fully-sparse ropes allocate nothing").
    pub(crate) fn is_fully_sparse(&self) -> bool {
        match self {
            QuadRope::Empty | QuadRope::Sparse(_) => true,
            QuadRope::Leaf(_) => false,
            QuadRope::HCat(c) | QuadRope::VCat(c) => {
                c.left.is_fully_sparse() && c.right.is_fully_sparse()
            }
            QuadRope::Slice(s) => s.inner.is_fully_sparse(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for QuadRope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_PREVIEW_ROWS: usize = 6;
        const MAX_PREVIEW_COLS: usize = 8;
        let rows = self.rows();
        let cols = self.cols();
        writeln!(f, "QuadRope [{}x{}] (depth {}, sparse: {})", rows, cols, self.depth(), self.is_sparse())?;
        for i in 0..rows.min(MAX_PREVIEW_ROWS) {
            write!(f, "[")?;
            for j in 0..cols.min(MAX_PREVIEW_COLS) {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", index::get(self, i, j).expect("in-bounds preview index"))?;
            }
            if cols > MAX_PREVIEW_COLS {
                write!(f, ", ...")?;
            }
            writeln!(f, "]")?;
        }
        if rows > MAX_PREVIEW_ROWS {
            writeln!(f, "... ({} rows total)", rows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ctor::{leaf, sparse};
    use crate::tile::Tile;

    #[test]
    fn shape_accessors_on_leaf_and_sparse() {
        let t = Tile::from_owned(vec![1, 2, 3, 4, 5, 6], 2, 3);
        let r = leaf(t);
        assert_eq!(r.rows(), 2);
        assert_eq!(r.cols(), 3);
        assert_eq!(r.depth(), 0);
        assert!(!r.is_sparse());

        let s = sparse(4, 5, 9i32);
        assert_eq!(s.rows(), 4);
        assert_eq!(s.cols(), 5);
        assert!(s.is_sparse());
        assert!(s.is_fully_sparse());
    }

    #[test]
    fn display_previews_contents() {
        let t = Tile::from_owned(vec![1, 2, 3, 4], 2, 2);
        let r = leaf(t);
        let shown = format!("{}", r);
        assert!(shown.contains("2x2"));
        assert!(shown.contains('1'));
    }
}
