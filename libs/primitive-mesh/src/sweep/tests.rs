//! # Sweep Kernel Tests

use super::*;
use approx::assert_relative_eq;
use proptest::prelude::*;
use std::f64::consts::PI;

fn cfg() -> TessellationConfig {
    TessellationConfig::default()
}

// =============================================================================
// SWEEP ANGLE
// =============================================================================

#[test]
fn test_sweep_angle_partial() {
    let sweep = sweep_angle(PI, &cfg()).unwrap();
    assert!(!sweep.full);
    assert_eq!(sweep.radians, PI);
}

#[test]
fn test_sweep_angle_near_full_turn_snaps() {
    let sweep = sweep_angle(TAU - 1e-6, &cfg()).unwrap();
    assert!(sweep.full);
    assert_eq!(sweep.radians, TAU);
}

#[test]
fn test_sweep_angle_above_full_turn_is_reduced() {
    let sweep = sweep_angle(3.0 * PI, &cfg()).unwrap();
    assert!(sweep.full);
    assert_eq!(sweep.radians, TAU);
}

#[test]
fn test_sweep_angle_rejects_non_positive() {
    assert!(sweep_angle(0.0, &cfg()).is_err());
    assert!(sweep_angle(-1.0, &cfg()).is_err());
    assert!(sweep_angle(f64::NAN, &cfg()).is_err());
    assert!(sweep_angle(f64::INFINITY, &cfg()).is_err());
}

// =============================================================================
// STEP COUNTS
// =============================================================================

#[test]
fn test_steps_close_exactly_on_pi() {
    let steps = chord_steps(20.0, PI, &cfg());
    assert_eq!(steps.increment, PI / steps.count as f64);
}

#[test]
fn test_small_radius_uses_coarse_increment() {
    let steps = chord_steps(0.3, TAU, &cfg());
    // 360 / 60
    assert_eq!(steps.count, 6);
}

#[test]
fn test_fixed_steps_exact_multiple() {
    let steps = fixed_steps(TAU, &cfg());
    assert_eq!(steps.count, 36);
    assert_relative_eq!(steps.increment, 10f64.to_radians(), epsilon = 1e-12);
}

#[test]
fn test_torus_scenario_step_count() {
    // Main radius of a torus with a 10 unit sweep radius and 2 unit section
    let steps = chord_steps(12.0, TAU, &cfg());
    let expected = (TAU / (2.0 * ((12.0 - 0.5) / 12.0_f64).acos())).ceil() as u32;
    assert_eq!(steps.count, expected);
}

#[test]
fn test_over_even_and_quartered() {
    assert_eq!(Steps::over_even(3.0, 1.0).count, 4);
    assert_eq!(Steps::over_even(4.0, 1.0).count, 4);
    assert_eq!(Steps::over_quartered(5.0, 1.0).count, 8);
    assert_eq!(Steps::over_quartered(8.0, 1.0).count, 8);
}

#[test]
fn test_steps_at_least_one() {
    let steps = Steps::over(1e-9, 1.0);
    assert_eq!(steps.count, 1);
    assert_eq!(steps.increment, 1e-9);
}

proptest! {
    #[test]
    fn chord_deviation_within_tolerance(radius in 0.5f64..1.0e5) {
        let cfg = cfg();
        let steps = chord_steps(radius, TAU, &cfg);
        let deviation = radius * (1.0 - (PI / steps.count as f64).cos());
        prop_assert!(deviation <= cfg.deflection * (1.0 + 1e-6),
            "radius {} count {} deviation {}", radius, steps.count, deviation);
    }

    #[test]
    fn steps_reconstruct_total(total in 1e-3f64..TAU, max_step in 1e-3f64..PI) {
        let steps = Steps::over(total, max_step);
        prop_assert!((steps.increment * steps.count as f64 - total).abs() < 1e-9);
        prop_assert!(steps.increment <= max_step * (1.0 + 1e-6));
    }
}

// =============================================================================
// ROTATION
// =============================================================================

#[test]
fn test_rotated_sequence_returns_to_start() {
    let steps = chord_steps(10.0, TAU, &cfg());
    let rot = axis_rotation(DVec3::Z, steps.increment);
    let last = rotated_sequence(DVec3::X * 10.0, rot, steps.count as usize + 1)
        .last()
        .unwrap();
    assert!((last - DVec3::X * 10.0).length() < 1e-9);
}

#[test]
fn test_axis_rotation_normalizes_axis() {
    let rot = axis_rotation(DVec3::new(0.0, 0.0, 5.0), PI / 2.0);
    let v = rot * DVec3::X;
    assert!((v - DVec3::Y).length() < 1e-12);
}

#[test]
fn test_axis_rotation_zero_axis_is_identity() {
    assert_eq!(axis_rotation(DVec3::ZERO, 1.0), DQuat::IDENTITY);
}

#[test]
fn test_align_about_opposite_directions_stays_in_plane() {
    let rot = align_about(DVec3::Y, -DVec3::Y, DVec3::Z);
    assert!((rot * DVec3::Y + DVec3::Y).length() < 1e-12);
    // The axis itself is untouched
    assert!((rot * DVec3::Z - DVec3::Z).length() < 1e-12);
}

#[test]
fn test_closed_ring_repeats_first_point() {
    let rot = axis_rotation(DVec3::Z, TAU / 8.0);
    let ring = closed_ring(DVec3::ONE, DVec3::X, rot, 8);
    assert_eq!(ring.len(), 9);
    assert_eq!(ring[0], ring[8]);
    assert_eq!(ring[0], DVec3::new(2.0, 1.0, 1.0));
}

// =============================================================================
// DEGENERATE DIRECTIONS
// =============================================================================

#[test]
fn test_perpendicular_parallel_uses_fallback() {
    let p = perpendicular(DVec3::Z, DVec3::Z * 3.0, DVec3::X, &cfg());
    assert_eq!(p, DVec3::X);
}

#[test]
fn test_perpendicular_is_unit() {
    let p = perpendicular(DVec3::new(2.0, 0.0, 0.0), DVec3::new(0.0, 3.0, 0.0), DVec3::X, &cfg());
    assert_relative_eq!(p.length(), 1.0, epsilon = 1e-12);
    assert!((p - DVec3::Z).length() < 1e-12);
}

#[test]
fn test_reference_perpendicular_for_vertical_axis() {
    assert_eq!(reference_perpendicular(-DVec3::Z, &cfg()), DVec3::X);
    let p = reference_perpendicular(DVec3::new(1.0, 1.0, 0.0), &cfg());
    assert!(p.dot(DVec3::new(1.0, 1.0, 0.0)).abs() < 1e-12);
    assert_relative_eq!(p.length(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_unit_or_zero_vector() {
    assert_eq!(unit_or(DVec3::ZERO, DVec3::Y), DVec3::Y);
}

#[test]
fn test_perpendicular_ignores_input_length() {
    let a = DVec3::new(0.0, 0.0, 2e-3);
    let b = DVec3::new(2e-3, 0.0, 0.0);
    let p = perpendicular(a, b, DVec3::X, &cfg());
    assert!((p - DVec3::Y).length() < 1e-12);

    let huge = perpendicular(a * 1e6, b * 1e6, DVec3::X, &cfg());
    assert_eq!(p, huge);
}

#[test]
fn test_perpendicular_zero_input_uses_fallback() {
    assert_eq!(perpendicular(DVec3::ZERO, DVec3::X, DVec3::Y, &cfg()), DVec3::Y);
}
