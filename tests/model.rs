use std::collections::VecDeque;

use cowdeque::Deque;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    PushBack(i32),
    PushFront(i32),
    PopBack,
    PopFront,
    Extend(Vec<i32>),
    ExtendFront(Vec<i32>),
    ExtendFrontFiltered(Vec<i32>),
    RemoveFirstN(usize),
    RemoveLastN(usize),
    RemoveAll(bool),
    Reserve(usize),
    MakeContiguous,
    Set(usize, i32),
    Snapshot,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::PushBack),
        4 => any::<i32>().prop_map(Op::PushFront),
        2 => Just(Op::PopBack),
        2 => Just(Op::PopFront),
        1 => prop::collection::vec(any::<i32>(), 0..12).prop_map(Op::Extend),
        1 => prop::collection::vec(any::<i32>(), 0..12).prop_map(Op::ExtendFront),
        1 => prop::collection::vec(any::<i32>(), 0..12).prop_map(Op::ExtendFrontFiltered),
        1 => (0usize..16).prop_map(Op::RemoveFirstN),
        1 => (0usize..16).prop_map(Op::RemoveLastN),
        1 => any::<bool>().prop_map(Op::RemoveAll),
        1 => (0usize..40).prop_map(Op::Reserve),
        1 => Just(Op::MakeContiguous),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
        2 => Just(Op::Snapshot),
    ]
}

/// `peak` is the largest length or reserved capacity seen so far.
fn check(d: &Deque<i32>, v: &VecDeque<i32>, peak: usize) {
    assert_eq!(d.len(), v.len());
    assert!(d.capacity() >= d.len());
    assert!(
        d.capacity() <= 4.max(2 * (peak + 1)),
        "capacity {} out of proportion to peak length {peak}",
        d.capacity()
    );
    assert!(d.iter().eq(v.iter()));
    assert!(d.iter().rev().eq(v.iter().rev()));
    assert_eq!(d.iter().count(), d.len());
    assert_eq!(d.indices().map(|i| d[i]).collect::<Vec<_>>(), v.iter().copied().collect::<Vec<_>>());
    assert_eq!(d.distance(d.start_index(), d.end_index()), d.len() as isize);
    assert_eq!(d.front(), v.front());
    assert_eq!(d.back(), v.back());
}

fn apply(d: &mut Deque<i32>, v: &mut VecDeque<i32>, op: &Op) {
    match op {
        &Op::PushBack(x) => {
            d.push_back(x);
            v.push_back(x);
        }
        &Op::PushFront(x) => {
            d.push_front(x);
            v.push_front(x);
        }
        Op::PopBack => assert_eq!(d.pop_back(), v.pop_back()),
        Op::PopFront => assert_eq!(d.pop_front(), v.pop_front()),
        Op::Extend(items) => {
            d.extend(items.iter().copied());
            v.extend(items.iter().copied());
        }
        Op::ExtendFront(items) => {
            d.extend_front(items.iter().copied());
            for &x in items.iter().rev() {
                v.push_front(x);
            }
        }
        Op::ExtendFrontFiltered(items) => {
            // a lower size bound of zero or one, whatever the real length
            let mut it = items.iter().copied();
            let first = it.next();
            d.extend_front(first.into_iter().chain(it.filter(|_| true)));
            for &x in items.iter().rev() {
                v.push_front(x);
            }
        }
        &Op::RemoveFirstN(k) => {
            let k = k.min(v.len());
            d.remove_first_n(k);
            v.drain(..k);
        }
        &Op::RemoveLastN(k) => {
            let k = k.min(v.len());
            d.remove_last_n(k);
            v.truncate(v.len() - k);
        }
        &Op::RemoveAll(keep) => {
            d.remove_all(keep);
            v.clear();
        }
        &Op::Reserve(n) => {
            d.reserve_capacity(n);
            assert!(d.capacity() >= n);
        }
        Op::MakeContiguous => {
            assert_eq!(d.make_contiguous(), v.make_contiguous());
            assert!(d.is_contiguous());
        }
        &Op::Set(i, x) => {
            if !v.is_empty() {
                let i = i % v.len();
                d[i] = x;
                v[i] = x;
            }
        }
        Op::Snapshot => {}
    }
}

proptest! {
    #[test]
    fn matches_vecdeque(ops in prop::collection::vec(op(), 0..200)) {
        let mut d = Deque::new();
        let mut v = VecDeque::new();
        let mut snapshots: Vec<(Deque<i32>, Vec<i32>)> = Vec::new();
        let mut peak = 0;

        for op in &ops {
            if let Op::Snapshot = op {
                snapshots.push((d.clone(), v.iter().copied().collect()));
            }
            apply(&mut d, &mut v, op);
            if let &Op::Reserve(n) = op {
                peak = peak.max(n);
            }
            peak = peak.max(v.len());
            check(&d, &v, peak);
        }

        // every clone kept the contents it had when it was taken
        for (snapshot, expected) in &snapshots {
            prop_assert_eq!(snapshot, expected);
        }
    }

    #[test]
    fn repeated_prepends_grow_with_length(
        rounds in prop::collection::vec((0usize..4, any::<bool>()), 1..80),
    ) {
        let mut d = Deque::new();
        d.push_back(0u32);
        for (n, share) in rounds {
            let keep = if share { Some(d.clone()) } else { None };
            d.extend_front((0..n as u32).filter(|_| true));
            prop_assert!(d.capacity() <= 4.max(2 * (d.len() + 1)));
            drop(keep);
        }
    }

    #[test]
    fn unique_pushes_within_capacity_keep_indices(
        items in prop::collection::vec(any::<u8>(), 1..16),
        extra in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let mut d: Deque<u8> = Deque::with_capacity(items.len() + extra.len());
        d.extend(items.iter().copied());
        let indices: Vec<_> = d.indices().collect();
        d.extend(extra.iter().copied());
        for (i, &x) in indices.iter().zip(&items) {
            prop_assert_eq!(d[*i], x);
        }
    }
}
