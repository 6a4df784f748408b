use atys_mcmc::metrics::{MetricSample, MetricsRecorder};
use atys_mcmc::ScoreBreakdown;

fn sample(iteration: usize, total: f64, hash: &str) -> MetricSample {
    let mut score = ScoreBreakdown::zero();
    score.total = total;
    MetricSample {
        iteration,
        num_types: 2,
        score,
        untyped_atoms: 0,
        accepted_moves: iteration / 2,
        proposed_moves: iteration,
        hierarchy_hash: hash.to_string(),
    }
}

#[test]
fn empty_recorder_reports_empty_coverage() {
    let recorder = MetricsRecorder::new();
    let coverage = recorder.coverage();
    assert_eq!(coverage.unique_hierarchies, 0);
    assert_eq!(coverage.mean_score, 0.0);
    assert_eq!(coverage.score_variance, 0.0);
}

#[test]
fn repeated_hashes_count_once() {
    let mut recorder = MetricsRecorder::new();
    recorder.push_sample(sample(0, 1.0, "aaaa"));
    recorder.push_sample(sample(1, 1.0, "aaaa"));
    recorder.push_sample(sample(2, 3.0, "bbbb"));

    let coverage = recorder.coverage();
    assert_eq!(coverage.unique_hierarchies, 2);
    assert!((coverage.mean_score - 5.0 / 3.0).abs() < 1e-12);
    assert!(coverage.score_variance > 0.0);
    // Last sample: one accepted of two proposed.
    assert_eq!(coverage.final_acceptance_rate, 0.5);
}

#[test]
fn single_sample_has_zero_variance() {
    let mut recorder = MetricsRecorder::new();
    recorder.push_sample(sample(0, 4.0, "cccc"));

    let coverage = recorder.coverage();
    assert_eq!(coverage.unique_hierarchies, 1);
    assert_eq!(coverage.mean_score, 4.0);
    assert_eq!(coverage.score_variance, 0.0);
    // Zero proposals reports a zero rate rather than dividing by zero.
    assert_eq!(coverage.final_acceptance_rate, 0.0);
}
