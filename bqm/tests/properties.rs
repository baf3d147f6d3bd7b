//! Model-level properties checked over random and exhaustive inputs

use bqm::{
    BinaryPolynomialModel, BinaryQuadraticModel, BqmError, CooMatrix, DenseBqm, DenseMatrix,
    ErrorCategory, LoadConfig, QuadraticStore, Sample, SparseBqm, Vartype,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOLERANCE: f64 = 1e-9;

/// Dyadic coefficient in [-4, 4], exact under the conversion law
fn coefficient(rng: &mut StdRng) -> f64 {
    f64::from(rng.gen_range(-16..=16)) / 4.0
}

fn random_model<S: QuadraticStore<u32>>(rng: &mut StdRng, n: u32, vartype: Vartype) -> BinaryQuadraticModel<u32, S> {
    let mut bqm = BinaryQuadraticModel::new(vartype);
    for label in 0..n {
        bqm.add_variable(label, coefficient(rng)).unwrap();
    }
    for _ in 0..2 * n {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        bqm.add_interaction(u, v, coefficient(rng)).unwrap();
    }
    bqm.add_offset(coefficient(rng));
    bqm
}

fn assignments(n: u32, vartype: Vartype) -> Vec<Sample<u32>> {
    let low = if vartype == Vartype::Spin { -1 } else { 0 };
    (0..1u32 << n)
        .map(|bits| {
            (0..n)
                .map(|i| (i, if bits >> i & 1 == 1 { 1 } else { low }))
                .collect()
        })
        .collect()
}

fn convert_sample(sample: &Sample<u32>, from: Vartype, to: Vartype) -> Sample<u32> {
    sample
        .iter()
        .map(|(&label, &value)| (label, from.convert_value(value, to).unwrap()))
        .collect()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() <= TOLERANCE, "{a} != {b}");
}

#[test]
fn energy_is_preserved_by_change_vartype() {
    let mut rng = StdRng::seed_from_u64(7);
    for vartype in [Vartype::Spin, Vartype::Binary] {
        for _ in 0..20 {
            let bqm: SparseBqm<u32> = random_model(&mut rng, 5, vartype);
            let other = bqm.to_vartype(vartype.other()).unwrap();
            for sample in assignments(5, vartype) {
                let converted = convert_sample(&sample, vartype, vartype.other());
                assert_close(
                    bqm.energy(&sample).unwrap(),
                    other.energy(&converted).unwrap(),
                );
            }
        }
    }
}

#[test]
fn dense_energy_is_preserved_by_change_vartype() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut bqm: DenseBqm<u32> = random_model(&mut rng, 6, Vartype::Binary);
    let energies = bqm.energies(&assignments(6, Vartype::Binary)).unwrap();
    bqm.change_vartype(Vartype::Spin).unwrap();
    let spin_samples: Vec<_> = assignments(6, Vartype::Binary)
        .iter()
        .map(|s| convert_sample(s, Vartype::Binary, Vartype::Spin))
        .collect();
    for (expected, actual) in energies.iter().zip(bqm.energies(&spin_samples).unwrap()) {
        assert_close(*expected, actual);
    }
}

#[test]
fn domain_round_trip_restores_coefficients() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let bqm: DenseBqm<u32> = random_model(&mut rng, 8, Vartype::Spin);
        let back = bqm
            .to_vartype(Vartype::Binary)
            .and_then(|b| b.to_vartype(Vartype::Spin))
            .unwrap();
        for label in bqm.variables() {
            assert_close(bqm.get_linear(&label).unwrap(), back.get_linear(&label).unwrap());
        }
        for ((u, v), coupling) in bqm.quadratic() {
            assert_close(coupling, back.get_quadratic(&u, &v).unwrap());
        }
        assert_close(bqm.offset(), back.offset());
    }
}

#[test]
fn dense_and_sparse_agree_on_the_same_calls() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut dense = DenseBqm::new(Vartype::Spin);
    let mut sparse = SparseBqm::new(Vartype::Spin);
    for step in 0..200 {
        let u = rng.gen_range(0..12u32);
        let v = rng.gen_range(0..12u32);
        let bias = coefficient(&mut rng);
        match step % 7 {
            0 => {
                dense.add_variable(u, bias).unwrap();
                sparse.add_variable(u, bias).unwrap();
            }
            6 if dense.contains(&u) => {
                dense.remove_variable(&u).unwrap();
                sparse.remove_variable(&u).unwrap();
            }
            _ => {
                dense.add_interaction(u, v, bias).unwrap();
                sparse.add_interaction(u, v, bias).unwrap();
            }
        }
    }
    assert_eq!(dense.linear(), sparse.linear());
    assert_eq!(dense.quadratic(), sparse.quadratic());
    assert_eq!(dense.offset(), sparse.offset());
    assert_eq!(dense.sorted_variables(), sparse.sorted_variables());
    assert_eq!(dense.to_sparse().quadratic(), sparse.quadratic());
    assert_eq!(sparse.to_dense().linear(), dense.linear());
}

#[test]
fn removal_leaves_other_interactions_untouched() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut bqm: DenseBqm<u32> = random_model(&mut rng, 10, Vartype::Spin);
    let before = bqm.quadratic();
    bqm.remove_variable(&4).unwrap();

    assert!(!bqm.contains(&4));
    let after = bqm.quadratic();
    assert!(after.keys().all(|(u, v)| *u != 4 && *v != 4));
    let expected: Vec<_> = before
        .into_iter()
        .filter(|((u, v), _)| *u != 4 && *v != 4)
        .collect();
    assert_eq!(after.len(), expected.len());
    for (pair, coupling) in expected {
        assert_eq!(after[&pair].to_bits(), coupling.to_bits());
    }
}

#[test]
fn accumulation_is_order_independent() {
    let mut dense = DenseBqm::new(Vartype::Binary);
    let mut sparse = SparseBqm::new(Vartype::Binary);
    dense.add_interaction("x", "y", 1.25).unwrap();
    dense.add_interaction("y", "x", 0.5).unwrap();
    sparse.add_interaction("y", "x", 1.25).unwrap();
    sparse.add_interaction("x", "y", 0.5).unwrap();
    assert_eq!(dense.get_quadratic(&"x", &"y"), Ok(1.75));
    assert_eq!(sparse.get_quadratic(&"y", &"x"), Ok(1.75));
    assert_eq!(dense.num_interactions(), 1);
    assert_eq!(sparse.num_interactions(), 1);
}

#[test]
fn self_pair_matches_add_variable() {
    let mut a = SparseBqm::new(Vartype::Spin);
    let mut b = SparseBqm::new(Vartype::Spin);
    a.add_variable(1, 1.0).unwrap();
    a.add_interaction(1, 1, 2.0).unwrap();
    b.add_variable(1, 1.0).unwrap();
    b.add_variable(1, 2.0).unwrap();
    assert_eq!(a.linear(), b.linear());
    assert_eq!(a.num_interactions(), 0);
}

#[test]
fn bulk_length_mismatch_is_rejected_atomically() {
    let mut bqm = SparseBqm::new(Vartype::Spin);
    bqm.add_interaction(0, 1, 1.0).unwrap();
    let snapshot = (bqm.linear(), bqm.quadratic(), bqm.offset(), bqm.num_variables());

    let err = bqm
        .add_interactions_from_lists(vec![(1, 2), (2, 3), (3, 4)], vec![1.0, 2.0], Vartype::Spin)
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);
    assert_eq!(
        snapshot,
        (bqm.linear(), bqm.quadratic(), bqm.offset(), bqm.num_variables())
    );

    let mut bpm = BinaryPolynomialModel::new(Vartype::Spin);
    let err = bpm
        .add_interactions_from_lists(vec![vec![0], vec![1], vec![2]], vec![1.0, 2.0], Vartype::None)
        .unwrap_err();
    assert_eq!(err, BqmError::LengthMismatch);
    assert_eq!(bpm.num_interactions(), 0);
}

#[test]
fn serializable_round_trip_is_exact() {
    let mut rng = StdRng::seed_from_u64(9);
    let bqm: SparseBqm<u32> = random_model(&mut rng, 7, Vartype::Binary);
    let serializable = bqm.to_serializable();
    assert_eq!(serializable.num_variables, 7);
    assert_eq!(serializable.num_interactions, bqm.num_interactions());

    let back = DenseBqm::from_serializable(&serializable).unwrap();
    assert_eq!(back.linear(), bqm.linear());
    assert_eq!(back.quadratic(), bqm.quadratic());
    assert_eq!(back.offset(), bqm.offset());
    assert_eq!(back.vartype(), bqm.vartype());
    assert_eq!(back.sorted_variables(), bqm.sorted_variables());
}

#[test]
fn polynomial_expansion_is_exact() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut bpm = BinaryPolynomialModel::new(Vartype::Binary);
    for _ in 0..15 {
        let arity = rng.gen_range(1..=4);
        let mut key: Vec<u32> = (0..5).collect();
        for i in 0..arity {
            let j = rng.gen_range(i..5);
            key.swap(i, j);
        }
        key.truncate(arity);
        bpm.add_interaction(key, coefficient(&mut rng)).unwrap();
    }
    bpm.add_offset(0.75);

    let spin = bpm.to_vartype(Vartype::Spin).unwrap();
    let labels: Vec<u32> = bpm.variables();
    for bits in 0..1u32 << labels.len() {
        let binary: Sample<u32> = labels
            .iter()
            .enumerate()
            .map(|(i, &l)| (l, (bits >> i & 1) as i32))
            .collect();
        let spins = convert_sample(&binary, Vartype::Binary, Vartype::Spin);
        assert_eq!(bpm.energy(&binary), spin.energy(&spins));
    }

    let back = spin.to_vartype(Vartype::Binary).unwrap();
    assert_eq!(back.polynomial(), bpm.polynomial());
    assert_eq!(back.offset(), bpm.offset());
}

#[test]
fn symmetric_matrix_loads_in_both_modes() {
    let matrix = DenseMatrix::from_rows(vec![
        vec![1.0, 0.5, -0.25],
        vec![0.5, 0.0, 2.0],
        vec![-0.25, 2.0, -1.0],
    ])
    .unwrap();
    let labels = vec!['a', 'b', 'c'];
    let folded = DenseBqm::from_matrix(&matrix, labels.clone(), 0.0, Vartype::Binary, &LoadConfig::default()).unwrap();
    let strict = SparseBqm::from_matrix(&matrix, labels, 0.0, Vartype::Binary, &LoadConfig::strict()).unwrap();
    assert_eq!(folded.quadratic(), strict.quadratic());
    assert_eq!(folded.get_quadratic(&'a', &'b'), Ok(1.0));
    assert_eq!(folded.get_linear(&'c'), Ok(-1.0));

    // energy equals x^T M x
    for sample in assignments(3, Vartype::Binary) {
        let x: Vec<f64> = (0..3u32).map(|i| f64::from(sample[&i])).collect();
        let sample: Sample<char> = ['a', 'b', 'c'].iter().zip(&x).map(|(&l, &v)| (l, v as i32)).collect();
        let mut expected = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                expected += x[i] * matrix.get(i, j).unwrap_or(0.0) * x[j];
            }
        }
        assert_close(strict.energy(&sample).unwrap(), expected);
    }
}

#[test]
fn asymmetric_matrix_is_folded_or_rejected() {
    let upper = CooMatrix::from_triplets(3, 3, vec![(0, 1, 3.0), (1, 2, -1.0), (2, 2, 0.5)]).unwrap();
    let labels = vec![10u32, 20, 30];

    let bqm = DenseBqm::from_matrix(&upper, labels.clone(), 1.0, Vartype::Spin, &LoadConfig::default()).unwrap();
    assert_eq!(bqm.get_quadratic(&10, &20), Ok(3.0));
    assert_eq!(bqm.get_quadratic(&20, &30), Ok(-1.0));
    assert_eq!(bqm.get_linear(&30), Ok(0.5));
    assert_eq!(bqm.offset(), 1.0);

    let err = SparseBqm::from_matrix(&upper, labels.clone(), 0.0, Vartype::Spin, &LoadConfig::strict()).unwrap_err();
    assert_eq!(err, BqmError::AsymmetricMatrix);
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);

    let err = SparseBqm::from_matrix(&upper, vec![1u32, 2], 0.0, Vartype::Spin, &LoadConfig::default()).unwrap_err();
    assert_eq!(err, BqmError::DimensionMismatch);
    let err = SparseBqm::from_matrix(&upper, vec![1u32, 1, 2], 0.0, Vartype::Spin, &LoadConfig::default()).unwrap_err();
    assert_eq!(err, BqmError::DuplicateLabel);
}

fn assert_same_model<S1, S2>(a: &BinaryQuadraticModel<u32, S1>, b: &BinaryQuadraticModel<u32, S2>, n: u32)
where
    S1: QuadraticStore<u32>,
    S2: QuadraticStore<u32>,
{
    assert_eq!(a.sorted_variables(), b.sorted_variables());
    assert_eq!(a.linear(), b.linear());
    assert_eq!(a.quadratic(), b.quadratic());
    assert_eq!(a.offset(), b.offset());
    assert_eq!(a.vartype(), b.vartype());
    for sample in assignments(n, a.vartype()) {
        assert_close(a.energy(&sample).unwrap(), b.energy(&sample).unwrap());
    }
}

#[test]
fn interaction_matrix_export_reloads_to_an_equal_model() {
    let mut rng = StdRng::seed_from_u64(21);
    for vartype in [Vartype::Spin, Vartype::Binary] {
        for _ in 0..10 {
            let bqm: DenseBqm<u32> = random_model(&mut rng, 5, vartype);
            let (labels, matrix) = bqm.interaction_matrix().unwrap();
            assert_eq!(matrix.nrows(), 6);
            let config = LoadConfig::default();

            let sparse = SparseBqm::from_matrix(&matrix, labels.clone(), bqm.offset(), vartype, &config).unwrap();
            assert_same_model(&bqm, &sparse, 5);

            let dense = DenseBqm::from_matrix(&matrix, labels, bqm.offset(), vartype, &config).unwrap();
            assert_same_model(&bqm, &dense, 5);
            assert_eq!(dense.interaction_matrix().unwrap().1, matrix);
        }
    }
}
