use floater::{FloaterError, Viewport, load_vector_paths, parse_vector_paths};
use std::path::Path;

fn fixture() -> &'static Path {
    Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/floater_paths.svg"
    ))
}

#[test]
fn fixture_loads_all_paths() {
    let paths = load_vector_paths(fixture()).unwrap();
    assert_eq!(paths.len(), 3);
    for path in &paths {
        // Four curve segments per fixture path, minus the trailing two.
        assert_eq!(path.points().len(), 2);
    }
}

#[test]
fn normalized_coordinates_lie_in_the_unit_square() {
    let paths = load_vector_paths(fixture()).unwrap();
    for path in &paths {
        for p in path.points() {
            assert!((0.0..=1.0).contains(&p.x), "x = {}", p.x);
            assert!((0.0..=1.0).contains(&p.y), "y = {}", p.y);
        }
    }
}

#[test]
fn resize_scales_every_point_exactly() {
    let paths = load_vector_paths(fixture()).unwrap();
    let viewport = Viewport::new(1280, 720).unwrap();
    for path in &paths {
        let sized = path.resize(viewport);
        assert_eq!(sized.points().len(), path.points().len());
        for (scaled, normalized) in sized.points().iter().zip(path.points()) {
            assert_eq!(scaled.x, normalized.x * 1280.0);
            assert_eq!(scaled.y, normalized.y * 720.0);
        }
    }
}

#[test]
fn resize_is_independent_per_viewport() {
    let paths = load_vector_paths(fixture()).unwrap();
    let small = paths[0].resize(Viewport::new(100, 100).unwrap());
    let large = paths[0].resize(Viewport::new(200, 200).unwrap());
    assert!(large.length() > small.length());
    // Uniform scaling scales arc length linearly.
    assert!((large.length() - 2.0 * small.length()).abs() < 1e-3 * large.length());
}

#[test]
fn malformed_documents_yield_typed_errors() {
    assert!(matches!(
        parse_vector_paths("<svg viewBox=\"0 0\"><path d=\"M0,0c1,1 2,2 3,3\"/></svg>"),
        Err(FloaterError::Svg(_))
    ));
    assert!(matches!(
        parse_vector_paths("<svg viewBox=\"0 0 10 10\"><path d=\"not a path\"/></svg>"),
        Err(FloaterError::Svg(_))
    ));
    assert!(matches!(
        parse_vector_paths("not xml at <all"),
        Err(FloaterError::Svg(_))
    ));
}

#[test]
fn documents_without_paths_load_empty() {
    let paths = parse_vector_paths("<svg viewBox=\"0 0 10 10\"></svg>").unwrap();
    assert!(paths.is_empty());
}
