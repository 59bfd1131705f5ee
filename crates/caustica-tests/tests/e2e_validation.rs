//! Input and config validation through the public surface.

use caustica_engine::{generate_lens, GenerateError, ScalarGrid};
use caustica_spec::{ConfigError, LensConfig};
use caustica_tests::fixtures;

#[test]
fn test_undersized_targets_are_rejected() {
    for (w, h) in [(1, 8), (8, 1), (0, 0)] {
        let err = generate_lens(ScalarGrid::filled(w, h, 1.0), &LensConfig::default())
            .unwrap_err();
        assert!(
            matches!(err, GenerateError::InvalidInput(_)),
            "{}x{} must be rejected",
            w,
            h
        );
    }
}

#[test]
fn test_target_without_energy_is_rejected() {
    let err = generate_lens(ScalarGrid::new(8, 8), &LensConfig::default()).unwrap_err();
    assert!(matches!(err, GenerateError::InvalidInput(_)));
}

#[test]
fn test_config_errors_surface_as_bad_config() {
    let bad = [
        LensConfig::builder().omega(2.0).build(),
        LensConfig::builder().refractive_index(0.9).build(),
        LensConfig::builder().solidify_offset(-1.0).build(),
        LensConfig::builder().inner_tolerance(0.0).build(),
        LensConfig::builder().inner_max_sweeps(0).build(),
        LensConfig::builder().focal_distance(0.0).build(),
    ];
    for config in bad {
        let err = generate_lens(fixtures::uniform(8), &config).unwrap_err();
        assert!(matches!(err, GenerateError::BadConfig(_)));
    }
}

#[test]
fn test_json_config_round_trips_through_the_engine() {
    let config = LensConfig::from_json_str(
        r#"{"iterations": 2, "refractive_index": 1.52, "solidify_offset": 5.0}"#,
    )
    .unwrap();
    let solid = generate_lens(fixtures::uniform(8), &config).unwrap();

    let layer = 9 * 9;
    assert!(solid.nodes[layer..].iter().all(|n| n.z == -5.0));
}

#[test]
fn test_json_config_rejects_unknown_fields() {
    let err = LensConfig::from_json_str(r#"{"iterations": 2, "wavelength": 550}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_json_config_rejects_zero_iterations_but_engine_accepts_it() {
    assert!(matches!(
        LensConfig::from_json_str(r#"{"iterations": 0}"#),
        Err(ConfigError::Iterations(0))
    ));

    // The typed surface treats 0 as "no transport passes".
    let config = LensConfig::builder().iterations(0).build();
    assert!(generate_lens(fixtures::uniform(8), &config).is_ok());
}
