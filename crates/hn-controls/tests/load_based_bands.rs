//! Reference behavior of the load-based controller at the band edges.

use hn_controls::{LoadBasedController, LoadBasedState};
use hn_core::{Real, SensorId};
use proptest::prelude::*;

fn controller(thresholds: &[Real], deadband: Real) -> LoadBasedController {
    LoadBasedController::new(SensorId::from_index(0), thresholds.to_vec(), deadband, 0.0).unwrap()
}

fn step(c: &LoadBasedController, on: bool, signal: Real) -> bool {
    let state = LoadBasedState {
        on,
        since_transition: c.min_cycle,
    };
    c.advance(&state, signal, 0.1).on
}

#[test]
fn below_first_threshold_switches_off_past_deadband() {
    let c = controller(&[0.2, 0.5, 0.8], 0.05);
    assert!(step(&c, true, 0.16));
    assert!(!step(&c, true, 0.14));
    // Exactly on the threshold is still band −1.
    assert!(step(&c, true, 0.2));
    // Never turns on from band −1.
    assert!(!step(&c, false, 0.1));
}

#[test]
fn even_band_switches_on_past_deadband() {
    let c = controller(&[0.2, 0.5, 0.8], 0.05);
    assert!(!step(&c, false, 0.24));
    assert!(step(&c, false, 0.26));
    assert!(step(&c, true, 0.21));
}

#[test]
fn odd_band_switches_off_below_next_threshold() {
    let c = controller(&[0.2, 0.5, 0.8], 0.05);
    assert!(step(&c, true, 0.76));
    assert!(!step(&c, true, 0.74));
    assert!(!step(&c, false, 0.6));
}

#[test]
fn even_top_band_switches_on() {
    let c = controller(&[0.2, 0.5, 0.8], 0.05);
    assert!(!step(&c, false, 0.84));
    assert!(step(&c, false, 0.86));
}

#[test]
fn odd_top_band_holds() {
    let c = controller(&[0.2, 0.5], 0.05);
    assert!(step(&c, true, 0.9));
    assert!(!step(&c, false, 0.9));
    assert!(!step(&c, false, 100.0));
}

#[test]
fn zero_deadband_toggles_at_thresholds() {
    let c = controller(&[0.5], 0.0);
    assert!(!step(&c, true, 0.49));
    assert!(step(&c, true, 0.5));
    assert!(step(&c, false, 0.51));
}

proptest! {
    #[test]
    fn signal_inside_deadband_never_toggles(
        t in 0.1f64..0.9,
        db in 0.01f64..0.1,
        frac in -0.99f64..0.99,
        on in any::<bool>(),
    ) {
        let c = controller(&[t], db);
        let signal = t + frac * db;
        prop_assert_eq!(step(&c, on, signal), on);
    }

    #[test]
    fn dwell_timer_accumulates_without_transition(dt in 0.001f64..1.0, n in 1usize..20) {
        let c = LoadBasedController::new(SensorId::from_index(0), vec![0.5], 0.0, 0.25).unwrap();
        let mut s = c.initial_state();
        for _ in 0..n {
            s = c.advance(&s, 0.5, dt);
        }
        prop_assert!(s.on);
        prop_assert!((s.since_transition - (0.25 + n as f64 * dt)).abs() < 1e-9);
    }
}
