//! Integration Tests
//!
//! End-to-end behavior of the equalizer through the public API.

use approx::assert_relative_eq;
use biquad_eq::dsp::{
    split, BandFilter, BandSettings, Equalizer, EqualizerSettings, FilterType, RawCoefficients,
    MAX_CHANNELS,
};
use biquad_eq::EqError;
use proptest::prelude::*;
use std::thread;

const SAMPLE_RATE: f32 = 48000.0;

/// Route library logs to the test harness (RUST_LOG=biquad_eq=trace)
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run a unit impulse through a mono equalizer
fn impulse_response(eq: &mut Equalizer, len: usize) -> Vec<f32> {
    let mut out = [0.0_f32];
    (0..len)
        .map(|i| {
            let x = if i == 0 { 1.0 } else { 0.0 };
            eq.process_frame(&[x], &mut out);
            out[0]
        })
        .collect()
}

fn sine(frequency: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * frequency * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

// === Concrete Scenarios ===

#[test]
fn test_lowpass_band_impulse_response() {
    let mut eq = Equalizer::new(SAMPLE_RATE, 1, 1).unwrap();
    eq.set_band_params(0, 1000.0, 1.0, 0.0, FilterType::Lowpass);

    let expected = RawCoefficients::design(FilterType::Lowpass, SAMPLE_RATE, 1000.0, 1.0, 0.0)
        .normalize();
    let response = impulse_response(&mut eq, 1024);

    assert_eq!(response[0], expected.a0);
    assert!(response.iter().all(|v| v.is_finite()));

    // Rises to a peak, rings below zero, then dies out
    let peak = response.iter().cloned().fold(f32::MIN, f32::max);
    assert!(peak > response[0]);
    assert!(response.iter().any(|&v| v < 0.0));
    assert!(response[900..].iter().all(|v| v.abs() < 1e-12));
}

#[test]
fn test_parametric_zero_gain_collapses_to_identity() {
    let raw = RawCoefficients::design(FilterType::ParametricEq, SAMPLE_RATE, 750.0, 1.3, 0.0);
    assert_eq!(raw.a0, raw.b0);
    assert_eq!(raw.a1, raw.b1);
    assert_eq!(raw.a2, raw.b2);

    let c = raw.normalize();
    assert_eq!(c.a0, 1.0);
    assert_eq!(c.a1, c.b1);
    assert_eq!(c.a2, c.b2);
}

#[test]
fn test_normalization_reconstructs_b0() {
    for filter_type in [
        FilterType::Lowpass,
        FilterType::Highpass,
        FilterType::Bandpass,
        FilterType::Notch,
        FilterType::ParametricEq,
        FilterType::AllPass,
    ] {
        for &frequency in &[40.0_f32, 440.0, 5000.0, 18000.0] {
            let raw = RawCoefficients::design(filter_type, SAMPLE_RATE, frequency, 1.0, -6.0);
            let c = raw.normalize();
            assert_relative_eq!(c.b1 * raw.b0, raw.b1, max_relative = 1e-5);
            assert_relative_eq!(c.b2 * raw.b0, raw.b2, max_relative = 1e-5);
            assert_relative_eq!(c.a0 * raw.b0, raw.a0, max_relative = 1e-5);
        }
    }
}

// === Cascade ===

#[test]
fn test_three_disabled_bands_are_transparent() {
    let mut eq = Equalizer::new(SAMPLE_RATE, 3, 2).unwrap();
    eq.apply_settings(&EqualizerSettings::new(vec![
        BandSettings::highpass(200.0, 1.0).disabled(),
        BandSettings::parametric(1000.0, 1.0, 9.0).disabled(),
        BandSettings::lowpass(3000.0, 1.0).disabled(),
    ]))
    .unwrap();

    let left = sine(220.0, 2048);
    let right = sine(5500.0, 2048);
    let mut out = [0.0_f32; 2];
    for (&l, &r) in left.iter().zip(&right) {
        eq.process_frame(&[l, r], &mut out);
        assert_eq!(out, [l, r]);
    }
}

#[test]
fn test_flat_equalizer_is_near_transparent() {
    let mut eq = Equalizer::new(SAMPLE_RATE, 6, 1).unwrap();
    let signal = sine(1000.0, 4800);
    let mut out = [0.0_f32];
    for &x in &signal {
        eq.process_frame(&[x], &mut out);
        assert!((out[0] - x).abs() < 1e-4, "flat band changed signal");
    }
}

#[test]
fn test_max_channels_supported() {
    let mut eq = Equalizer::new(SAMPLE_RATE, 2, MAX_CHANNELS).unwrap();
    eq.set_band_params(0, 1000.0, 1.0, 0.0, FilterType::Lowpass);
    let a0 = eq.band(0).unwrap().coefficients().a0;

    let input = [1.0_f32; MAX_CHANNELS];
    let mut out = [0.0_f32; MAX_CHANNELS];
    eq.process_frame(&input, &mut out);

    // Band 1 is flat, so the first sample is band 0's a0 passed through unity
    for &y in &out {
        assert_relative_eq!(y, a0, max_relative = 1e-6);
    }

    let err = Equalizer::new(SAMPLE_RATE, 2, MAX_CHANNELS + 1).unwrap_err();
    assert_eq!(err.error_code(), "TOO_MANY_CHANNELS");
}

#[test]
fn test_band_handles_stay_stable() {
    init_logging();
    let mut eq = Equalizer::new(SAMPLE_RATE, 4, 1).unwrap();
    for band in 0..4 {
        eq.set_band_frequency(band, 100.0 * (band + 1) as f32);
    }
    eq.set_band_enabled(2, false);
    eq.set_band_gain_db(7, 3.0);

    let frequencies: Vec<f32> = eq.bands().iter().map(BandFilter::frequency_hz).collect();
    assert_eq!(frequencies, vec![100.0, 200.0, 300.0, 400.0]);
    assert!(!eq.band(2).unwrap().is_enabled());
}

// === Reset / No-op ===

#[test]
fn test_reset_restores_fresh_response() {
    let mut fresh = Equalizer::new(SAMPLE_RATE, 2, 1).unwrap();
    fresh.set_band_params(0, 500.0, 1.0, 0.0, FilterType::Highpass);
    fresh.set_band_params(1, 2000.0, 0.7, 5.0, FilterType::ParametricEq);
    let mut perturbed = fresh.clone();

    let expected = impulse_response(&mut fresh, 300);

    let mut out = [0.0_f32];
    for &x in &sine(3333.0, 500) {
        perturbed.process_frame(&[x], &mut out);
    }
    perturbed.reset();

    assert_eq!(impulse_response(&mut perturbed, 300), expected);
}

#[test]
fn test_repeated_settings_do_not_disturb_state() {
    let settings = EqualizerSettings::new(vec![
        BandSettings::parametric(800.0, 1.0, 6.0),
        BandSettings::lowpass(6000.0, 1.0),
    ]);

    let mut reference = Equalizer::new(SAMPLE_RATE, 2, 1).unwrap();
    reference.apply_settings(&settings).unwrap();
    let mut eq = reference.clone();

    let signal = sine(900.0, 1000);
    let mut a = [0.0_f32];
    let mut b = [0.0_f32];
    for (i, &x) in signal.iter().enumerate() {
        if i % 100 == 0 {
            eq.apply_settings(&settings).unwrap();
        }
        reference.process_frame(&[x], &mut a);
        eq.process_frame(&[x], &mut b);
        assert_eq!(a[0].to_bits(), b[0].to_bits());
    }
}

// === Cross-thread Control ===

#[test]
fn test_controller_drives_processor_across_threads() {
    init_logging();
    let eq = Equalizer::new(SAMPLE_RATE, 2, 1).unwrap();
    let (controller, mut processor) = split(eq, 16);

    let audio = thread::spawn(move || {
        let mut out = [0.0_f32];
        let mut last = 0.0;
        // Keep processing until both updates are visible
        for _ in 0..1_000_000 {
            processor.process_frame(&[0.0], &mut out);
            let eq = processor.equalizer();
            if eq.band(0).unwrap().filter_type() == FilterType::Lowpass
                && eq.band(1).unwrap().gain_db() == -6.0
            {
                last = eq.band(0).unwrap().frequency_hz();
                break;
            }
            thread::yield_now();
        }
        last
    });

    controller
        .set_band_params(0, 1500.0, 1.0, 0.0, FilterType::Lowpass)
        .unwrap();
    controller.set_band_gain_db(1, -6.0).unwrap();

    assert_eq!(audio.join().unwrap(), 1500.0);
    assert!(matches!(
        controller.set_band_gain_db(2, 0.0),
        Err(EqError::BandOutOfRange { .. }) | Err(EqError::Disconnected)
    ));
}

// === Properties ===

proptest! {
    #[test]
    fn prop_disabled_band_is_identity(
        samples in proptest::collection::vec(-1.0_f32..1.0, 1..64),
        frequency in 20.0_f32..20000.0,
        bandwidth in 0.1_f32..4.0,
        gain in -24.0_f32..24.0,
    ) {
        let mut filter = BandFilter::default();
        filter.init(SAMPLE_RATE, 1, FilterType::ParametricEq, frequency, bandwidth, gain);
        filter.set_enabled(false);

        let mut out = [0.0_f32];
        for &x in &samples {
            filter.process_frame(&[x], &mut out);
            prop_assert_eq!(out[0], x);
        }
        prop_assert!(filter.is_quiescent());
    }

    #[test]
    fn prop_parametric_zero_gain_identity(
        frequency in 20.0_f32..20000.0,
        bandwidth in 0.1_f32..4.0,
    ) {
        let c = RawCoefficients::design(FilterType::ParametricEq, SAMPLE_RATE, frequency, bandwidth, 0.0)
            .normalize();
        prop_assert_eq!(c.a0, 1.0);
        prop_assert_eq!(c.a1, c.b1);
        prop_assert_eq!(c.a2, c.b2);
    }
}
