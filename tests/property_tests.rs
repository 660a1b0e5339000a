//! Property tests for the control policy and the sensor decode path.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets.

#![cfg(not(target_os = "espidf"))]

use plantbed::control::hysteresis::{HysteresisController, ThresholdPolicy, ValveState};
use plantbed::sensors::sht31::{crc8, decode_frame};
use proptest::prelude::*;

const START: f32 = 30.0;
const STOP: f32 = 60.0;

fn controller() -> HysteresisController {
    HysteresisController::new(ThresholdPolicy::new(START, STOP))
}

/// Drive the controller into a known prior state.
fn with_prior(prior: ValveState) -> HysteresisController {
    let mut c = controller();
    match prior {
        ValveState::Open => c.decide(0.0),
        ValveState::Closed => c.decide(100.0),
    };
    c
}

fn arb_prior() -> impl Strategy<Value = ValveState> {
    prop_oneof![Just(ValveState::Open), Just(ValveState::Closed)]
}

proptest! {
    /// Any humidity at or below `start` opens, regardless of prior state.
    #[test]
    fn at_or_below_start_always_opens(h in 0.0f32..=START, prior in arb_prior()) {
        let mut c = with_prior(prior);
        prop_assert_eq!(c.decide(h), ValveState::Open);
    }

    /// Any humidity at or above `stop` closes, regardless of prior state.
    #[test]
    fn at_or_above_stop_always_closes(h in STOP..=100.0f32, prior in arb_prior()) {
        let mut c = with_prior(prior);
        prop_assert_eq!(c.decide(h), ValveState::Closed);
    }

    /// Strictly inside the dead band the state never changes — the
    /// no-oscillation property, for every prior state.
    #[test]
    fn dead_band_is_a_hold(
        h in (START..STOP).prop_filter("strictly inside the band", |h| *h > START),
        prior in arb_prior(),
    ) {
        let mut c = with_prior(prior);
        prop_assert_eq!(c.decide(h), prior);
    }

    /// Arbitrary sample sequences never reach a state that disagrees
    /// with replaying the same sequence through the transition rules.
    #[test]
    fn controller_matches_reference_transition_rules(
        samples in proptest::collection::vec(0.0f32..=100.0, 1..200),
    ) {
        let mut c = controller();
        let mut reference = ValveState::Closed;
        for h in samples {
            let decided = c.decide(h);
            if h <= START {
                reference = ValveState::Open;
            } else if h >= STOP {
                reference = ValveState::Closed;
            }
            prop_assert_eq!(decided, reference, "diverged at h={}", h);
        }
    }

    /// Decoding a synthetic frame reproduces the documented transfer
    /// functions exactly (within float tolerance).
    #[test]
    fn decode_round_trip(raw_t: u16, raw_h: u16) {
        let t = raw_t.to_be_bytes();
        let h = raw_h.to_be_bytes();
        let frame = [t[0], t[1], crc8(&t), h[0], h[1], crc8(&h)];

        let reading = decode_frame(&frame).unwrap();
        let expect_t = -49.0 + 315.0 * f64::from(raw_t) / 65535.0;
        let expect_h = 100.0 * f64::from(raw_h) / 65535.0;
        prop_assert!((f64::from(reading.temperature_f) - expect_t).abs() < 1e-3);
        prop_assert!((f64::from(reading.humidity_pct) - expect_h).abs() < 1e-3);
    }

    /// A corrupted checksum is always rejected, never mis-decoded.
    #[test]
    fn corrupted_crc_never_decodes(raw_t: u16, raw_h: u16, flip in 0u8..6) {
        let t = raw_t.to_be_bytes();
        let h = raw_h.to_be_bytes();
        let mut frame = [t[0], t[1], crc8(&t), h[0], h[1], crc8(&h)];
        // Flipping any single bit must break one of the checksums.
        frame[flip as usize] ^= 0x01;
        prop_assert!(decode_frame(&frame).is_err());
    }
}
