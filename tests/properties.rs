//! Integration tests for the quad rope invariants and scenarios: shape
//! preservation, algebraic laws (involutions, associativity, identities),
//! and the concrete worked examples.

use quadrope::{
    compress, create, equals, from_flat_array, get, hcat, hfilter, identity, init, is_sparse,
    materialize, prod, reallocate, reduce, scan, singleton, slice, sum, to_array_2d, transpose,
    vcat,
};

fn grid(h: usize, w: usize) -> quadrope::Link<i64> {
    init(h, w, |i, j| (i * w + j) as i64).unwrap()
}

#[test]
fn s1_init_positions_and_indexing() {
    let r = init(3, 4, |i, j| (i * 4 + j) as i64).unwrap();
    assert_eq!(
        to_array_2d(&r),
        vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9, 10, 11]]
    );
    assert_eq!(get(&r, 2, 3).unwrap(), 11);
}

#[test]
fn s2_create_sum_and_prod_short_circuit() {
    let r = create(10, 10, 7.0);
    assert_eq!(sum(&r), 700.0);

    let zero = create(2, 3, 0.0);
    let poisoned = create(2, 5, 9.0);
    let cat = hcat(zero, poisoned).unwrap();
    assert_eq!(prod(&cat), 0.0);
}

#[test]
fn s3_transpose_of_symmetric_matrix_equals_original() {
    let a = init(5, 5, |i, j| (i + j) as i64).unwrap();
    let b = transpose(&a);
    assert!(equals(&a, &b));
}

#[test]
fn s4_scan_of_ones_gives_rectangle_counts() {
    let r = init(4, 4, |_, _| 1i64).unwrap();
    let out = scan(&r, |_, _| 0i64, |a, b| a + b, |a, b| a - b);
    for i in 0..4 {
        for j in 0..4 {
            let expected = ((i + 1) * (j + 1)) as i64;
            assert_eq!(get(&out, i, j).unwrap(), expected);
        }
    }
}

#[test]
fn s5_hcat_of_sparse_and_dense() {
    let r = hcat(create(3, 2, 0i64), init(3, 2, |i, j| (i + j) as i64).unwrap()).unwrap();
    assert_eq!(quadrope::cols(&r), 4);
    assert_eq!(get(&r, 1, 0).unwrap(), 0);
    assert_eq!(get(&r, 1, 3).unwrap(), 2);
}

#[test]
fn s6_hfilter_keeps_even_values() {
    let r = init(1, 10, |_, j| j as i64).unwrap();
    let kept = hfilter(&r, |v| v % 2 == 0).unwrap();
    assert_eq!(quadrope::rows(&kept), 1);
    assert_eq!(quadrope::cols(&kept), 5);
    assert_eq!(quadrope::to_flat_array(&kept), vec![0, 2, 4, 6, 8]);
}

#[test]
fn invariant_shape_preservation_across_map() {
    let r = grid(4, 5);
    let mapped = quadrope::map(&r, |v| v * 2);
    assert_eq!(quadrope::rows(&mapped), quadrope::rows(&r));
    assert_eq!(quadrope::cols(&mapped), quadrope::cols(&r));
}

#[test]
fn invariant_materialize_is_content_preserving() {
    let r = grid(6, 6);
    let sliced = slice(&r, 1, 1, 3, 3);
    let flat_before = quadrope::to_flat_array(&sliced);
    let m = materialize(&sliced);
    assert_eq!(quadrope::to_flat_array(&m), flat_before);
}

#[test]
fn invariant_transpose_is_an_involution() {
    let r = init(3, 5, |i, j| (i * 5 + j) as i64).unwrap();
    let tt = transpose(&transpose(&r));
    assert!(equals(&r, &tt));
    assert_eq!(get(&transpose(&r), 2, 1).unwrap(), get(&r, 1, 2).unwrap());
}

#[test]
fn invariant_cat_associativity_on_content() {
    let a = grid(2, 2);
    let b = grid(2, 3);
    let c = grid(2, 4);
    let left = hcat(hcat(a.clone(), b.clone()).unwrap(), c.clone()).unwrap();
    let right = hcat(a, hcat(b, c).unwrap()).unwrap();
    assert_eq!(to_array_2d(&left), to_array_2d(&right));
}

#[test]
fn invariant_vcat_associativity_on_content() {
    let a = grid(2, 3);
    let b = grid(3, 3);
    let c = grid(1, 3);
    let left = vcat(vcat(a.clone(), b.clone()).unwrap(), c.clone()).unwrap();
    let right = vcat(a, vcat(b, c).unwrap()).unwrap();
    assert_eq!(to_array_2d(&left), to_array_2d(&right));
}

#[test]
fn invariant_slice_composition() {
    let r = grid(10, 10);
    let once = slice(&r, 2, 3, 6, 6);
    let twice = slice(&once, 1, 1, 3, 3);
    let direct = slice(&r, 3, 4, 3, 3);
    assert_eq!(quadrope::to_flat_array(&twice), quadrope::to_flat_array(&direct));
}

#[test]
fn invariant_sparse_equivalence_create_vs_init() {
    let a = create(5, 5, 3i64);
    let b = init(5, 5, |_, _| 3i64).unwrap();
    assert!(equals(&a, &b));
}

#[test]
fn invariant_compress_preserves_content() {
    let r = grid(4, 4);
    let flat_before = quadrope::to_flat_array(&r);
    let compressed = compress(&r);
    assert_eq!(quadrope::to_flat_array(&compressed), flat_before);

    let constant = create(4, 4, 9i64);
    let flattened = reallocate(&constant);
    assert!(!is_sparse(&flattened));
    let round_trip = compress(&flattened);
    assert!(is_sparse(&round_trip));
}

#[test]
fn invariant_reallocate_preserves_content_and_flattens() {
    let a = grid(3, 3);
    let b = grid(3, 3);
    let cat = hcat(a, b).unwrap();
    let before = quadrope::to_flat_array(&cat);
    let flat = reallocate(&cat);
    assert_eq!(quadrope::to_flat_array(&flat), before);
    assert!(matches!(&*flat, quadrope::QuadRope::Leaf(_)));
}

#[test]
fn invariant_reduce_identity_laws() {
    let empty: quadrope::Link<i64> = quadrope::empty();
    assert_eq!(reduce(&empty, &0i64, |acc, v| acc + v), 0);

    let one = singleton(42i64);
    assert_eq!(reduce(&one, &0i64, |acc, v| acc + v), 42);
}

#[test]
fn invariant_parallel_agreement_on_reduce_and_map() {
    let r = grid(12, 9);
    let seq_sum = reduce(&r, &0i64, |acc, v| acc + v);
    let par_sum = quadrope::par_reduce(&r, &0i64, |acc, v| acc + v);
    assert_eq!(seq_sum, par_sum);

    let seq_map = quadrope::to_flat_array(&quadrope::map(&r, |v| v * v));
    let par_map = quadrope::to_flat_array(&quadrope::par_map(&r, &|v| v * v));
    assert_eq!(seq_map, par_map);
}

#[test]
fn invariant_from_flat_array_round_trips() {
    let data: Vec<i64> = (0..20).collect();
    let r = from_flat_array(data.clone(), 4).unwrap();
    assert_eq!(quadrope::to_flat_array(&r), data);
}

#[test]
fn invariant_identity_diagonal() {
    let n = 6;
    let r = identity(n);
    let r = r.unwrap();
    for i in 0..n {
        for j in 0..n {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_eq!(get(&r, i, j).unwrap(), expected);
        }
    }
}

#[test]
fn invariant_map_until_can_be_resumed() {
    let r = grid(8, 8);
    let mut budget = 10;
    let progress = quadrope::map_until(
        &r,
        &mut || {
            if budget == 0 {
                false
            } else {
                budget -= 1;
                true
            }
        },
        &mut |v| v * 10,
    );
    assert!(progress.remaining.is_some());

    if let Some(rest) = progress.remaining {
        let finished = quadrope::map_until(&rest, &mut || true, &mut |v| v * 10);
        assert!(finished.remaining.is_none());
    }
}
