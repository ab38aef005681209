use mortar_engine::{
    bearing, elevation, parse, range, FiringSolver, GridReference, InterpolationMode, BASE_GRID,
};
use nalgebra::Vector2;

#[test]
fn test_reference_positions() {
    assert_eq!(parse("A1").unwrap().position(), Vector2::new(150.0, 150.0));
    assert_eq!(parse("A1K5").unwrap().position(), Vector2::new(150.0, 150.0));
    assert_eq!(parse("A1K1").unwrap().position(), Vector2::new(50.0, 250.0));
    assert_eq!(parse("A1K05").unwrap().keypads(), &[5]);
    assert_eq!(BASE_GRID, 300.0);
}

#[test]
fn test_direct_construction_validates() {
    assert!(GridReference::new('A', 1, vec![0]).is_err());
    assert!(GridReference::new('A', 1, vec![10]).is_err());
    assert!(GridReference::new('A', 1, vec![1, 9]).is_ok());
}

#[test]
fn test_parse_error_kinds() {
    for bad in ["1A", "A", "AK5"] {
        assert!(parse(bad).unwrap_err().is_parse(), "{bad}");
    }
}

#[test]
fn test_bearing_and_range_contract() {
    let o = Vector2::new(0.0, 0.0);
    assert!((bearing(&o, &Vector2::new(0.0, -100.0)) - 0.0).abs() < 1e-10);
    assert!((bearing(&o, &Vector2::new(100.0, 0.0)) - 90.0).abs() < 1e-10);
    assert!((bearing(&o, &Vector2::new(0.0, 100.0)) - 180.0).abs() < 1e-10);
    assert!((bearing(&o, &Vector2::new(-100.0, 0.0)) - 270.0).abs() < 1e-10);
    assert_eq!(range(&o, &Vector2::new(300.0, 400.0)), 500.0);
}

#[test]
fn test_elevation_contract() {
    let top = elevation(50.0);
    assert!(top.reachable);
    assert_eq!(top.mils, 1579.0);
    let bottom = elevation(1250.0);
    assert!(bottom.reachable);
    assert_eq!(bottom.mils, 800.0);
    assert!(!elevation(49.0).reachable);
    assert!(!elevation(1251.0).reachable);
}

#[test]
fn test_elevation_curve_shape() {
    // dense sampling: every value sits inside the table's mils band
    let mut d = 50.0;
    while d <= 1250.0 {
        let result = elevation(d);
        assert!(result.reachable);
        assert!(result.mils <= 1600.0 && result.mils >= 790.0, "{d}: {}", result.mils);
        d += 7.5;
    }
}

#[test]
fn test_solution_matches_components() {
    let base = parse("B4K73").unwrap();
    let target = parse("D2K19").unwrap();
    let solver = FiringSolver::new();
    let solution = solver.solve_refs(&base, &target);

    let (from, to) = (base.position(), target.position());
    assert_eq!(solution.bearing_degrees, bearing(&from, &to));
    assert_eq!(solution.distance_units, range(&from, &to));
    let expected = elevation(solution.distance_units);
    assert_eq!(solution.reachable, expected.reachable);
    assert_eq!(solution.elevation(), expected.mils());
}

#[test]
fn test_reverse_solution_is_opposite_bearing() {
    let solver = FiringSolver::new().with_mode(InterpolationMode::Linear);
    let out = solver.solve("C3K2", "E5K8").unwrap();
    let back = solver.solve("E5K8", "C3K2").unwrap();
    assert!((out.distance_units - back.distance_units).abs() < 1e-9);
    let diff = (out.bearing_degrees - back.bearing_degrees).abs();
    assert!((diff - 180.0).abs() < 1e-9);
}

#[test]
fn test_repeated_solves_are_bit_identical() {
    let a = mortar_engine::solve("F6K314", "H9K27").unwrap();
    let b = mortar_engine::solve("F6K314", "H9K27").unwrap();
    assert_eq!(a.bearing_degrees.to_bits(), b.bearing_degrees.to_bits());
    assert_eq!(a.distance_units.to_bits(), b.distance_units.to_bits());
    assert_eq!(a.elevation_mils.to_bits(), b.elevation_mils.to_bits());
}
