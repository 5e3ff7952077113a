//! Property tests for the bounded ring.
//!
//! A `VecDeque` capped at `C - 1` elements serves as the model; every
//! operation sequence must leave the ring and the model agreeing on depth
//! and contents.

use std::collections::VecDeque;

use ghostpoint_queue::MessageQueue;
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

#[derive(Debug, Clone)]
enum Op {
    Enqueue(u16),
    Dequeue,
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => any::<u16>().prop_map(Op::Enqueue),
        3 => Just(Op::Dequeue),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_ring_matches_model(
        capacity in 2usize..16,
        ops in proptest::collection::vec(op_strategy(), 0..200),
    ) {
        let queue = MessageQueue::new(capacity)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut model: VecDeque<u16> = VecDeque::new();

        for op in ops {
            match op {
                Op::Enqueue(v) => {
                    let accepted = queue.enqueue(v);
                    let model_accepts = model.len() < capacity - 1;
                    prop_assert_eq!(accepted, model_accepts);
                    if model_accepts {
                        model.push_back(v);
                    }
                }
                Op::Dequeue => {
                    prop_assert_eq!(queue.dequeue(), model.pop_front());
                }
                Op::Clear => {
                    queue.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(queue.depth(), model.len());
            prop_assert!(queue.depth() <= capacity - 1);
        }
    }

    #[test]
    fn prop_full_ring_rejects_and_keeps_contents(capacity in 2usize..64, extra in 1usize..8) {
        let queue = MessageQueue::new(capacity)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        for i in 0..capacity - 1 {
            prop_assert!(queue.enqueue(i));
        }
        for _ in 0..extra {
            prop_assert!(!queue.enqueue(usize::MAX));
        }
        prop_assert_eq!(queue.depth(), capacity - 1);
        for i in 0..capacity - 1 {
            prop_assert_eq!(queue.dequeue(), Some(i));
        }
        prop_assert_eq!(queue.dequeue(), None);
    }
}

#[quickcheck]
fn clear_always_empties(values: Vec<u8>) -> bool {
    let Ok(queue) = MessageQueue::new(32) else {
        return false;
    };
    for v in values {
        let _accepted = queue.enqueue(v);
    }
    queue.clear();
    queue.depth() == 0 && queue.dequeue().is_none()
}

#[quickcheck]
fn counters_balance(values: Vec<u8>) -> bool {
    let Ok(queue) = MessageQueue::new(8) else {
        return false;
    };
    for v in &values {
        let _accepted = queue.enqueue(*v);
    }
    while queue.dequeue().is_some() {}
    let snap = queue.counters();
    snap.enqueued + snap.rejected == values.len() as u64 && snap.dequeued == snap.enqueued
}
