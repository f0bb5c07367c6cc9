use readout_core::{NoiseParams, RelaxationParams};
use readout_er::{
    er_fidelity, sweep_thresholds, ErModel, ErPoint, SweepOpts, ThresholdSweep, TransientModel,
    DEFAULT_THRESHOLD_NUM,
};

const OUT_EXCITED: f64 = 5e-3;
const OUT_GROUND: f64 = 100e-3;
const RELAX: f64 = 10.0;

fn relaxation() -> RelaxationParams {
    RelaxationParams::new(OUT_EXCITED, OUT_GROUND, RELAX).expect("relaxation")
}

#[test]
fn sweep_curves_share_one_length() {
    let sweep = er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 1e-3, 5.0, 10e3, 5e3).expect("sweep");
    assert_eq!(sweep.len(), DEFAULT_THRESHOLD_NUM);
    assert_eq!(sweep.f0.len(), sweep.len());
    assert_eq!(sweep.f1.len(), sweep.len());
    assert_eq!(sweep.visibility.len(), sweep.len());
}

#[test]
fn thresholds_increase_strictly_inside_unit_interval() {
    let sweep = er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 1e-3, 5.0, 10e3, 5e3).expect("sweep");
    assert!(sweep.thresholds[0] > 0.0);
    assert!(*sweep.thresholds.last().expect("non-empty") < 1.0);
    for pair in sweep.thresholds.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn best_index_points_at_the_maximum() {
    let sweep = er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 3e-4, 2.0, 10e3, 2e3).expect("sweep");
    let max = sweep
        .visibility
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(sweep.visibility[sweep.best_index], max);
    assert!(sweep.visibility[..sweep.best_index].iter().all(|v| *v < max));
    let best = sweep.best().expect("best point");
    assert_eq!(best.threshold, sweep.thresholds[sweep.best_index]);
    assert_eq!(best.visibility(), sweep.visibility[sweep.best_index]);
}

#[test]
fn nyquist_limited_chain_has_single_peak() {
    // One independent sample at snr 5 leaves a spread of 0.2 on both levels.
    let sweep = er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 1e-4, 5.0, 10e3, 5e3).expect("sweep");
    let best = sweep.best_index;
    assert_eq!(best, 500);
    for i in 1..=best {
        assert!(sweep.visibility[i] > sweep.visibility[i - 1], "rising at {i}");
    }
    for i in best + 1..sweep.len() {
        assert!(sweep.visibility[i] < sweep.visibility[i - 1], "falling at {i}");
    }
}

#[test]
fn saturated_plateau_resolves_to_first_index() {
    let noise = NoiseParams::new(50.0, 10e3, 5e3, 1e-2).expect("noise");
    let opts = SweepOpts {
        threshold_num: 11,
        ..SweepOpts::default()
    };
    let sweep = sweep_thresholds(&relaxation(), &noise, &opts).expect("sweep");
    assert!(sweep.visibility.iter().all(|v| *v == 1.0));
    assert_eq!(sweep.best_index, 0);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let first = er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 2e-3, 3.0, 50e3, 10e3).expect("sweep");
    let second = er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 2e-3, 3.0, 50e3, 10e3).expect("sweep");
    assert_eq!(first, second);
}

#[test]
fn invalid_inputs_are_rejected() {
    let cases = [
        (er_fidelity(0.0, OUT_GROUND, RELAX, 1e-3, 5.0, 10e3, 5e3), "non-positive"),
        (er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 0.0, 5.0, 10e3, 5e3), "non-positive"),
        (er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 1e-3, -1.0, 10e3, 5e3), "non-positive"),
        (er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 1e-3, 5.0, 10e3, 6e3), "cutoff-above-nyquist"),
        (er_fidelity(OUT_EXCITED, f64::NAN, RELAX, 1e-3, 5.0, 10e3, 5e3), "non-finite"),
    ];
    for (result, code) in cases {
        let err = result.expect_err("must fail");
        assert!(err.is_invalid_parameter());
        assert_eq!(err.info().code, code);
    }
}

#[test]
fn empty_grid_is_rejected() {
    let noise = NoiseParams::new(5.0, 10e3, 5e3, 1e-3).expect("noise");
    let opts = SweepOpts {
        threshold_num: 0,
        ..SweepOpts::default()
    };
    let err = sweep_thresholds(&relaxation(), &noise, &opts).expect_err("empty grid");
    assert_eq!(err.info().code, "empty-grid");
}

#[test]
fn transient_model_yields_probabilities() {
    let noise = NoiseParams::new(5.0, 10e3, 5e3, 1e-3).expect("noise");
    let opts = SweepOpts {
        threshold_num: 21,
        model: ErModel::Transient {
            in_time_ground: 1e-3,
            panels: 4,
        },
    };
    let sweep = sweep_thresholds(&relaxation(), &noise, &opts).expect("sweep");
    assert_eq!(sweep.len(), 21);
    for (f0, f1) in sweep.f0.iter().zip(&sweep.f1) {
        assert!((0.0..=1.0).contains(f0));
        assert!((0.0..=1.0).contains(f1));
    }
    for pair in sweep.f0.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
}

#[test]
fn transient_model_counts_window_samples() {
    let noise = NoiseParams::new(5.0, 10e3, 5e3, 1e-3).expect("noise");
    let model = TransientModel::new(&relaxation(), &noise, 1e-3, 4).expect("model");
    let summary = model.summary();
    assert!((summary.window_samples - 10.0).abs() < 1e-9);
    assert!((summary.tunnel_in_samples - 10.0).abs() < 1e-9);
    assert!((summary.tunnel_out_samples - 50.0).abs() < 1e-9);
    assert!(summary.unresolved_fraction > 0.0 && summary.unresolved_fraction < 1.0);
}

#[test]
fn transient_model_needs_a_long_enough_window() {
    let noise = NoiseParams::new(5.0, 10e3, 5e3, 1e-4).expect("noise");
    let err = TransientModel::new(&relaxation(), &noise, 1e-3, 4).expect_err("too short");
    assert_eq!(err.info().code, "window-too-short");
    assert!(err.info().hint.is_some());
}

#[test]
fn model_tag_round_trips_through_json() {
    let opts: SweepOpts =
        serde_json::from_str(r#"{"model":{"kind":"transient","in_time_ground":0.001}}"#)
            .expect("opts");
    assert_eq!(opts.threshold_num, DEFAULT_THRESHOLD_NUM);
    assert_eq!(
        opts.model,
        ErModel::Transient {
            in_time_ground: 1e-3,
            panels: 24
        }
    );
    let empty: SweepOpts = serde_json::from_str("{}").expect("defaults");
    assert_eq!(empty, SweepOpts::default());
}

#[test]
fn decoded_sweeps_without_points_have_no_best() {
    let empty: ThresholdSweep = serde_json::from_str(
        r#"{"thresholds":[],"f0":[],"f1":[],"visibility":[],"best_index":0}"#,
    )
    .expect("empty sweep");
    assert!(empty.is_empty());
    assert_eq!(empty.best(), None);

    let ragged: ThresholdSweep = serde_json::from_str(
        r#"{"thresholds":[0.25,0.5],"f0":[0.9],"f1":[0.8,0.7],"visibility":[0.7,0.6],"best_index":1}"#,
    )
    .expect("ragged sweep");
    assert_eq!(ragged.best(), None);
    assert_eq!(
        ragged.point(0),
        Some(ErPoint {
            threshold: 0.25,
            f0: 0.9,
            f1: 0.8
        })
    );
}

#[test]
fn points_follow_the_curves() {
    let sweep = er_fidelity(OUT_EXCITED, OUT_GROUND, RELAX, 1e-3, 5.0, 10e3, 5e3).expect("sweep");
    for index in [0, 250, sweep.len() - 1] {
        let point = sweep.point(index).expect("in range");
        assert_eq!(point.threshold, sweep.thresholds[index]);
        assert_eq!(point.f0, sweep.f0[index]);
        assert_eq!(point.f1, sweep.f1[index]);
        assert_eq!(point.visibility(), sweep.visibility[index]);
    }
    assert_eq!(sweep.point(sweep.len()), None);
}

#[test]
fn transient_sweep_is_converged_on_long_windows() {
    // 1667 independent samples against a 50-sample tunnel-in time.
    let noise = NoiseParams::new(5.0, 100e3, 10e3, 0.05).expect("noise");
    let opts = SweepOpts {
        threshold_num: 101,
        model: ErModel::Transient {
            in_time_ground: 5e-4,
            panels: 24,
        },
    };
    let sweep = sweep_thresholds(&relaxation(), &noise, &opts).expect("sweep");
    let reference = TransientModel::new(&relaxation(), &noise, 5e-4, 400).expect("reference");
    assert!((reference.window_samples() - 5000.0 / 3.0).abs() < 1e-6);

    let best = sweep.best_index;
    assert!((85..=90).contains(&best), "best index {best}");
    for index in [0, 50, best - 1, best, best + 1, 100] {
        let point = sweep.point(index).expect("point");
        let (f0, f1) = reference.fidelities_at(point.threshold);
        assert_eq!(point.f0, f0);
        assert!(
            (point.f1 - f1).abs() < 1e-5,
            "threshold {}: {} vs {}",
            point.threshold,
            point.f1,
            f1
        );
    }
}
