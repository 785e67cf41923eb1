use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Error;
use crate::replay_buffer::ReplayBuffer;
use super::support::transition;

#[test]
fn test_new_rejects_zero_capacity() {
    assert!(matches!(ReplayBuffer::new(0), Err(Error::Config { .. })));
}

#[test]
fn test_fifo_eviction() {
    let mut buffer = ReplayBuffer::new(5).unwrap();
    for reward in 1..=7 {
        buffer.push(transition(reward as f32));
    }

    assert_eq!(buffer.len(), 5);
    assert!(buffer.is_full());
    let rewards: Vec<f32> = buffer.iter().map(|t| t.reward).collect();
    assert_eq!(rewards, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
}

#[test]
fn test_iter_while_filling() {
    let mut buffer = ReplayBuffer::new(4).unwrap();
    buffer.push(transition(1.0));
    buffer.push(transition(2.0));
    let rewards: Vec<f32> = buffer.iter().map(|t| t.reward).collect();
    assert_eq!(rewards, vec![1.0, 2.0]);
    assert!(!buffer.is_full());
}

#[test]
fn test_len_never_exceeds_capacity() {
    let mut buffer = ReplayBuffer::new(3).unwrap();
    for i in 0..10 {
        buffer.push(transition(i as f32));
        assert!(buffer.len() <= buffer.capacity());
    }
}

#[test]
fn test_sample_returns_distinct_transitions() {
    let mut buffer = ReplayBuffer::new(20).unwrap();
    for i in 0..20 {
        buffer.push(transition(i as f32));
    }

    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
        let batch = buffer.sample(8, &mut rng).unwrap();
        assert_eq!(batch.len(), 8);
        let distinct: HashSet<u32> = batch.iter().map(|t| t.reward as u32).collect();
        assert_eq!(distinct.len(), 8);
    }
}

#[test]
fn test_sample_whole_buffer() {
    let mut buffer = ReplayBuffer::new(4).unwrap();
    for i in 0..4 {
        buffer.push(transition(i as f32));
    }
    let mut rng = StdRng::seed_from_u64(1);
    let mut rewards: Vec<f32> = buffer.sample(4, &mut rng).unwrap().iter().map(|t| t.reward).collect();
    rewards.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(rewards, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_sample_more_than_stored_fails() {
    let mut buffer = ReplayBuffer::new(10).unwrap();
    buffer.push(transition(1.0));
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        buffer.sample(2, &mut rng),
        Err(Error::InsufficientSamples { requested: 2, available: 1 })
    ));
}

#[test]
fn test_clear() {
    let mut buffer = ReplayBuffer::new(3).unwrap();
    for i in 0..5 {
        buffer.push(transition(i as f32));
    }
    buffer.clear();
    assert!(buffer.is_empty());
    buffer.push(transition(9.0));
    assert_eq!(buffer.iter().map(|t| t.reward).collect::<Vec<_>>(), vec![9.0]);
}
