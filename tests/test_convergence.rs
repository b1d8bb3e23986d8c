//! Training loop termination and a hand-derived golden value.

use approx::assert_relative_eq;
use nlayer::feedforward::{Case, CaseSet, Net, StopCriteria, Topology, Trainer, Weights};

fn trainer(layers: &[usize], value: f64, learning_rate: f64) -> (Topology, Trainer) {
    let topology = Topology::new(layers).unwrap();
    let trainer = Net::new(topology.clone(), Weights::filled(&topology, value))
        .unwrap()
        .build_trainer(learning_rate);
    (topology, trainer)
}

#[test]
fn golden_single_epoch_of_2_2_1() {
    // All weights 0.5, input (0, 0), target 0, lambda 0.3:
    // hidden = (0.5, 0.5), output = sigmoid(0.5) = 0.6224593312018546
    // psi_out = -0.6224593312018546 * sigmoid'(0.5) = -0.14628025352695762
    // hidden-to-output weights become 0.5 + 0.3 * 0.5 * psi_out = 0.47805796197095635
    // input weights stay, the new output is sigmoid(0.47805796197095635)
    let (topology, mut trainer) = trainer(&[2, 2, 1], 0.5, 0.3);
    let cases = CaseSet::new(&topology, vec![Case::new(vec![0.0, 0.0], vec![0.0])]).unwrap();

    let outcome = trainer.train_until(&cases, &StopCriteria::new(1, 0.0)).unwrap();

    assert_eq!(outcome.epochs, 1);
    assert!(outcome.max_iterations_reached);
    assert!(!outcome.error_threshold_reached);
    assert_relative_eq!(outcome.average_error, 0.1905229695911415, epsilon = 1e-12);

    let weights = trainer.net_ref().weights();
    assert_relative_eq!(weights.matrix(1).get(0, 0), 0.47805796197095635, epsilon = 1e-12);
    assert_relative_eq!(weights.matrix(1).get(1, 0), 0.47805796197095635, epsilon = 1e-12);
    assert_eq!(weights.matrix(0), Weights::filled(&topology, 0.5).matrix(0));

    let output = trainer.net_mut().process(&[0.0, 0.0]).unwrap()[0];
    assert_relative_eq!(output, 0.6172891860240896, epsilon = 1e-12);
}

#[test]
fn stops_at_iteration_cap_when_threshold_is_unreachable() {
    let (topology, mut trainer) = trainer(&[2, 3, 1], 0.1, 0.5);
    let cases = CaseSet::new(
        &topology,
        vec![
            Case::new(vec![0.0, 1.0], vec![1.0]),
            Case::new(vec![1.0, 0.0], vec![1.0]),
            Case::new(vec![1.0, 1.0], vec![0.0]),
        ],
    )
    .unwrap();

    let outcome = trainer.train_until(&cases, &StopCriteria::new(25, 0.0)).unwrap();
    assert_eq!(outcome.epochs, 25);
    assert!(outcome.max_iterations_reached);
    assert!(!outcome.error_threshold_reached);
}

#[test]
fn generous_threshold_stops_after_one_epoch() {
    let (topology, mut trainer) = trainer(&[2, 2, 1], 0.5, 0.3);
    let cases = CaseSet::new(&topology, vec![Case::new(vec![1.0, 0.0], vec![1.0])]).unwrap();

    let outcome = trainer
        .train_until(&cases, &StopCriteria::new(1000, 1e9))
        .unwrap();
    assert_eq!(outcome.epochs, 1);
    assert!(outcome.error_threshold_reached);
    assert!(!outcome.max_iterations_reached);
}

#[test]
fn reachable_target_is_learned_before_the_cap() {
    let (topology, mut trainer) = trainer(&[2, 3, 1], 0.2, 0.5);
    let cases = CaseSet::new(&topology, vec![Case::new(vec![1.0, 0.5], vec![0.8])]).unwrap();

    let criteria = StopCriteria::new(100_000, 1e-6).with_progress_interval(1000);
    let outcome = trainer.train_until(&cases, &criteria).unwrap();

    assert!(outcome.error_threshold_reached);
    assert!(!outcome.max_iterations_reached);
    assert!(outcome.average_error <= 1e-6);
    assert!(outcome.epochs < 100_000);

    let output = trainer.net_mut().process(&[1.0, 0.5]).unwrap()[0];
    assert_relative_eq!(output, 0.8, epsilon = 2e-3);
}

#[test]
fn training_is_deterministic() {
    let run = || {
        let (topology, mut trainer) = trainer(&[3, 4, 2], 0.25, 0.4);
        let cases = CaseSet::new(
            &topology,
            vec![
                Case::new(vec![1.0, 0.0, 0.5], vec![1.0, 0.0]),
                Case::new(vec![0.0, 1.0, 0.5], vec![0.0, 1.0]),
            ],
        )
        .unwrap();
        let outcome = trainer.train_until(&cases, &StopCriteria::new(50, 0.0)).unwrap();
        (outcome, trainer.teardown().weights().clone())
    };

    let (first_outcome, first_weights) = run();
    let (second_outcome, second_weights) = run();
    assert_eq!(first_outcome, second_outcome);
    assert_eq!(first_weights, second_weights);
}
