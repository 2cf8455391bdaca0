use super::*;

#[test]
fn catalog_is_complete() {
    assert_eq!(DitherAlgorithm::all().count(), 24);
    let names: Vec<_> = DitherAlgorithm::all().map(|a| a.name()).collect();
    assert!(names.contains(&"FloydSteinberg"));
    assert!(names.contains(&"Bayer8x8"));
    assert!(names.contains(&"ClusteredDotSpiral5x5"));
}

#[test]
fn kernels_never_push_error_into_visited_pixels() {
    for algo in DitherAlgorithm::all() {
        if let DitherAlgorithm::ErrorDiffusion(k) = algo {
            for (col, &w) in k.rows[0].iter().enumerate() {
                if col <= k.origin {
                    assert_eq!(w, 0, "{} row 0 col {col}", k.name);
                }
            }
            let sum: u32 = k.rows.iter().flat_map(|r| r.iter()).map(|&w| u32::from(w)).sum();
            assert!(sum as f32 <= k.divisor, "{} over-diffuses", k.name);
        }
    }
}

#[test]
fn threshold_matrices_are_rectangular_and_in_range() {
    for algo in DitherAlgorithm::all() {
        if let DitherAlgorithm::Ordered(m) = algo {
            assert!(m.height() > 0);
            for row in m.rows {
                assert_eq!(row.len(), m.width(), "{} is ragged", m.name);
                for &cell in *row {
                    assert!(u32::from(cell) < m.max, "{} cell {cell}", m.name);
                }
            }
        }
    }
}

#[test]
fn lookup_ignores_case_and_punctuation() {
    assert_eq!(
        DitherAlgorithm::named("floyd-steinberg").map(|a| a.name()),
        Some("FloydSteinberg")
    );
    assert_eq!(
        DitherAlgorithm::named("BAYER_4X4").map(|a| a.name()),
        Some("Bayer4x4")
    );
    assert_eq!(
        DitherAlgorithm::named("Sierra2").map(|a| a.name()),
        Some("TwoRowSierra")
    );
    assert!(DitherAlgorithm::named("Bogus").is_none());
}

#[test]
fn clustered_dot_variants_stay_ordered() {
    for (name, matrix) in [
        ("ClusteredDot6x6_2", "ClusteredDot6x6"),
        ("ClusteredDot6x6_3", "ClusteredDot6x6"),
        ("ClusteredDotDiagonal8x8_2", "ClusteredDotDiagonal8x8"),
        ("ClusteredDotDiagonal8x8_3", "ClusteredDotDiagonal8x8"),
        ("ClusteredDotDiagonal16x16", "ClusteredDotDiagonal8x8"),
    ] {
        let found = DitherAlgorithm::resolve(name);
        assert!(matches!(found, DitherAlgorithm::Ordered(_)), "{name}");
        assert_eq!(found.name(), matrix);
    }
}

#[test]
fn unknown_algorithm_resolves_to_default() {
    assert_eq!(DitherAlgorithm::resolve("nope").name(), "StevenPigeon");
    assert_eq!(DitherAlgorithm::DEFAULT, DitherAlgorithm::resolve("stevenpigeon"));
}

#[test]
fn floyd_steinberg_taps_are_relative_to_origin() {
    let taps = FLOYD_STEINBERG.taps();
    assert_eq!(taps.len(), 4);
    assert_eq!(taps[0], (1, 0, 7.0 / 16.0));
    assert_eq!(taps[1], (-1, 1, 3.0 / 16.0));
}

#[test]
fn ordered_offset_is_centered() {
    // Bayer2x2 cell 0 sits below the midpoint, cell 3 above.
    let lo = BAYER_2X2.offset(0, 0, 1.0);
    let hi = BAYER_2X2.offset(0, 1, 1.0);
    assert!(lo < 0.0);
    assert!(hi > 0.0);
    assert_eq!(BAYER_2X2.offset(0, 0, 0.0), 0.0);
    assert_eq!(BAYER_2X2.offset(2, 2, 1.0), lo);
}
