mod common;

use common::*;
use spatial_entropy::*;
use std::f64::consts::E;

#[test]
fn square_ordered_one_cut() {
    let result = altieri_entropy(&SQUARE, &SQUARE_TYPES, Cut::Count(1), true, E).unwrap();

    assert_eq!(result.entropy, result.mutual_info + result.residue);
    assert_close(result.max_distance, 200f64.sqrt());
    assert_eq!(result.bands.len(), 2);

    // Baseline: AA 2, AB 4, BA 4, BB 2. The near band holds AA, AB and BA twice each, the far
    // band AB, BA and BB twice each, so both bands are uniform over three pair types.
    assert_eq!(result.baseline.total(), 12);
    for band in result.bands.iter() {
        assert_eq!(band.weight, 0.5);
        assert_eq!(band.pair_counts.total(), 6);
        assert_close(band.entropy, 3f64.ln());
        assert_close(band.mutual_info, 2f64.ln() / 3.0);
    }
    assert_close(result.residue, 3f64.ln());
    assert_close(result.mutual_info, 2f64.ln() / 3.0);
    assert!(result.entropy.is_finite());
}

#[test]
fn square_unordered_one_cut() {
    let result = altieri_entropy(&SQUARE, &SQUARE_TYPES, Cut::Count(1), false, E).unwrap();
    let h = reference_entropy(&[2, 4], E);
    assert_close(result.residue, h);
    assert_close(result.mutual_info, 2f64.ln() / 3.0);
    assert_eq!(result.entropy, result.mutual_info + result.residue);
}

#[test]
fn base_rescales_every_term() {
    let nats = altieri_entropy(&SQUARE, &SQUARE_TYPES, Cut::Default, false, E).unwrap();
    let bits = altieri_entropy(&SQUARE, &SQUARE_TYPES, Cut::Default, false, 2.0).unwrap();
    assert_close(bits.residue, nats.residue / 2f64.ln());
    assert_close(bits.mutual_info, nats.mutual_info / 2f64.ln());
}

#[test]
fn empty_band_contributes_nothing() {
    let result = Altieri::new()
        .cut(vec![0.0, 1.5, 5.0, 20.0])
        .compute(&SQUARE, &SQUARE_TYPES)
        .unwrap();
    let empty = &result.bands[1];
    assert_eq!(empty.band, Band { lo: 1.5, hi: 5.0 });
    assert_eq!(empty.pair_counts.total(), 0);
    assert_eq!(empty.entropy, 0.0);
    assert_eq!(empty.mutual_info, 0.0);

    let weights: f64 = result.bands.iter().map(|b| b.weight).sum();
    assert_close(weights, 1.0);
    assert_eq!(result.entropy, result.mutual_info + result.residue);
}

#[test]
fn all_bands_empty_is_degenerate() {
    let err = Altieri::new()
        .cut(vec![20.0, 30.0])
        .compute(&SQUARE, &SQUARE_TYPES)
        .unwrap_err();
    assert_eq!(err, Error::NoPairs { lo: 20.0, hi: 30.0 });
    assert!(!err.is_config());

    let err = altieri_entropy(&SQUARE, &SQUARE_TYPES, vec![0.0, 0.5, 0.9], true, E).unwrap_err();
    assert_eq!(err, Error::NoPairs { lo: 0.0, hi: 0.9 });
}

#[test]
fn counted_bands_cover_every_pair() {
    let points = normal_points(3, 200, 0.0, 10.0);
    let types = random_types(4, 200, 5);
    for cuts in 0..5 {
        let result = Altieri::new()
            .cut(Cut::Count(cuts))
            .compute(&points, &types)
            .unwrap();
        assert_eq!(result.bands.len(), cuts + 1);
        let banded: u64 = result.bands.iter().map(|b| b.pair_counts.total()).sum();
        assert_eq!(banded, result.baseline.total());
        assert_eq!(result.baseline.total(), 200 * 199);
    }
}

#[test]
fn coincident_points_are_degenerate() {
    let points = [[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
    let err = Altieri::new().compute(&points, &["a", "b", "a"]).unwrap_err();
    assert_eq!(err, Error::NoDistinctPairs);
}

#[test]
fn rejects_bad_configuration() {
    let bad_cuts = vec![
        Cut::Breaks(vec![]),
        Cut::Breaks(vec![0.0]),
        Cut::Breaks(vec![0.0, 5.0, 3.0]),
        Cut::Breaks(vec![-1.0, 3.0]),
    ];
    for cut in bad_cuts {
        let err = Altieri::new()
            .cut(cut.clone())
            .compute(&SQUARE, &SQUARE_TYPES)
            .unwrap_err();
        assert!(err.is_config(), "{:?}", cut);
    }

    let err = altieri_entropy(&SQUARE, &SQUARE_TYPES, Cut::Default, false, 1.0).unwrap_err();
    assert_eq!(err, Error::Config(ConfigError::InvalidLogBase(1.0)));

    // Configuration problems are reported even when the data would be degenerate too.
    let err = Altieri::new()
        .cut(vec![2.0, 1.0])
        .compute(&[[0.0], [0.0]], &[1, 1])
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn thousand_random_points() {
    let points = normal_points(0, 1000, 1000.0, 100.0);
    let types = random_types(1, 1000, 30);

    let cuts = vec![
        (Cut::Count(1), false),
        (Cut::Breaks(vec![0.0, 4.0, 10.0]), false),
        (Cut::Count(1), true),
    ];
    for (cut, ordered) in cuts {
        let result = altieri_entropy(&points, &types, cut, ordered, E).unwrap();
        assert_eq!(result.mutual_info + result.residue, result.entropy);
        assert!(result.mutual_info >= -1e-12);
        assert!(result.residue >= 0.0);
    }
}
