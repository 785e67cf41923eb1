use approx::assert_abs_diff_eq;
use ndarray::array;

use crate::approximator::ValueApproximator;
use crate::error::Error;
use crate::target::TargetNetwork;
use crate::targets::{bellman_target, compute_targets, double_bellman_target};
use crate::types::Transition;
use super::support::q_network;

#[test]
fn test_bellman_target() {
    let next = array![1.0, 4.0, -2.0];
    assert_eq!(bellman_target(2.0, true, next.view(), 0.9), 2.0);
    assert_abs_diff_eq!(bellman_target(2.0, false, next.view(), 0.9), 5.6f32, epsilon = 1e-6);
    assert_eq!(bellman_target(2.0, false, next.view(), 0.0), 2.0);
}

#[test]
fn test_terminal_target_is_reward() {
    let q = q_network(2, 3, 4);
    let target = TargetNetwork::new(&q);
    let transition = Transition::new(array![0.1, 0.2], 2, 7.5, array![0.3, 0.4], true);

    let batch = compute_targets(&[&transition], &q, &target, 0.99, false).unwrap();
    assert_eq!(batch.targets[[0, 2]], 7.5);
}

#[test]
fn test_non_terminal_target_bootstraps_from_target_network() {
    let q = q_network(2, 3, 4);
    let target = TargetNetwork::new(&q);
    let transition = Transition::new(array![0.1, 0.2], 1, -1.0, array![0.3, 0.4], false);

    let batch = compute_targets(&[&transition], &q, &target, 0.9, false).unwrap();
    let next_values = target.evaluate(transition.next_state.view());
    let max_next = next_values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert_abs_diff_eq!(batch.targets[[0, 1]], -1.0 + 0.9 * max_next, epsilon = 1e-5);
}

#[test]
fn test_other_actions_keep_current_prediction() {
    let q = q_network(2, 3, 4);
    let target = TargetNetwork::new(&q);
    let first = Transition::new(array![0.1, 0.2], 0, 1.0, array![0.3, 0.4], true);
    let second = Transition::new(array![-0.5, 0.9], 2, 0.0, array![0.0, 0.0], false);

    let batch = compute_targets(&[&first, &second], &q, &target, 0.9, false).unwrap();
    assert_eq!(batch.states.row(1), array![-0.5, 0.9]);

    let predicted = q.evaluate(first.state.view());
    assert_eq!(batch.targets[[0, 1]], predicted[1]);
    assert_eq!(batch.targets[[0, 2]], predicted[2]);

    let predicted = q.evaluate(second.state.view());
    assert_eq!(batch.targets[[1, 0]], predicted[0]);
    assert_eq!(batch.targets[[1, 1]], predicted[1]);
}

#[test]
fn test_rejects_bad_transitions() {
    let q = q_network(2, 3, 4);
    let target = TargetNetwork::new(&q);

    assert!(matches!(
        compute_targets(&[], &q, &target, 0.9, false),
        Err(Error::InsufficientSamples { .. })
    ));

    let bad_action = Transition::new(array![0.0, 0.0], 3, 0.0, array![0.0, 0.0], true);
    assert!(matches!(
        compute_targets(&[&bad_action], &q, &target, 0.9, false),
        Err(Error::InvalidAction { action: 3, action_count: 3 })
    ));

    let bad_state = Transition::new(array![0.0], 0, 0.0, array![0.0, 0.0], true);
    assert!(matches!(
        compute_targets(&[&bad_state], &q, &target, 0.9, false),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn test_double_bellman_target() {
    let selector = array![0.0, 5.0, 1.0];
    let next = array![9.0, 2.0, -1.0];
    assert_eq!(double_bellman_target(1.0, true, selector.view(), next.view(), 0.5).unwrap(), 1.0);
    assert_abs_diff_eq!(
        double_bellman_target(1.0, false, selector.view(), next.view(), 0.5).unwrap(),
        2.0f32,
        epsilon = 1e-6
    );
    assert!(matches!(
        double_bellman_target(1.0, false, array![f32::NAN].view(), array![1.0].view(), 0.5),
        Err(Error::Numerical(_))
    ));
}

#[test]
fn test_double_q_learning_selects_with_approximator() {
    let mut q = q_network(2, 3, 4);
    let target = TargetNetwork::new(&q);
    // move the approximator away from the target so the two can disagree
    let states = array![[0.3, 0.4], [0.1, 0.2]];
    let pushed = array![[-3.0, 4.0, 0.5], [2.0, -1.0, 6.0]];
    for _ in 0..20 {
        q.fit(states.view(), pushed.view()).unwrap();
    }

    let transition = Transition::new(array![0.1, 0.2], 0, -1.0, array![0.3, 0.4], false);
    let next_state = transition.next_state.view();
    let chosen = crate::exploration::argmax(q.evaluate(next_state).view()).unwrap();
    let valued = target.evaluate(next_state)[chosen];

    let batch = compute_targets(&[&transition], &q, &target, 0.9, true).unwrap();
    assert_abs_diff_eq!(batch.targets[[0, 0]], -1.0 + 0.9 * valued, epsilon = 1e-5);

    let standard = compute_targets(&[&transition], &q, &target, 0.9, false).unwrap();
    let max_next = target.evaluate(next_state).iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert_abs_diff_eq!(standard.targets[[0, 0]], -1.0 + 0.9 * max_next, epsilon = 1e-5);

    let predicted = q.evaluate(transition.state.view());
    assert_eq!(batch.targets[[0, 1]], predicted[1]);
    assert_eq!(batch.targets[[0, 2]], predicted[2]);
}

#[test]
fn test_double_q_learning_terminal_is_reward() {
    let q = q_network(2, 3, 4);
    let target = TargetNetwork::new(&q);
    let transition = Transition::new(array![0.1, 0.2], 1, 3.25, array![0.3, 0.4], true);

    let batch = compute_targets(&[&transition], &q, &target, 0.9, true).unwrap();
    assert_eq!(batch.targets[[0, 1]], 3.25);
}
