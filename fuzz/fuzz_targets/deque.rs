#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use cowdeque::Deque;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Back,
    Clear,
    Equals,
    Extend(Vec<i32>),
    ExtendFront(Vec<i32>),
    ExtendFrontUnsized(Vec<i32>),
    Front,
    Get(usize),
    GetMut(usize, i32),
    Indices,
    Iter,
    Len,
    MakeContiguous,
    PopBack,
    PopFront,
    PushBack(i32),
    PushFront(i32),
    RemoveAll(bool),
    RemoveFirstN(usize),
    RemoveLastN(usize),
    ReserveCapacity(u16),
    Snapshot,
    Restore,
}

const MAX_LEN: usize = 1000000;

fuzz_target!(|data: Vec<Op>| { fuzz(&data) });

fn fuzz(data: &[Op]) {
    // d2/v2 hold an older clone of d1/v1, which must never change behind our back
    let (mut d1, mut d2) = (Deque::<i32>::new(), Deque::<i32>::new());
    let (mut v1, mut v2) = (VecDeque::<i32>::new(), VecDeque::<i32>::new());

    for op in data {
        match op {
            Op::Back => {
                assert_eq!(d1.back(), v1.back());
                assert_eq!(d2.back(), v2.back());
            }
            Op::Clear => {
                d1.clear();
                v1.clear();
            }
            Op::Equals => {
                assert!(d1.iter().eq(v1.iter()));
                assert!(d2.iter().eq(v2.iter()));
            }
            Op::Extend(items) => {
                if v1.len() < MAX_LEN {
                    d1.extend(items.iter().copied());
                    v1.extend(items.iter().copied());
                }
            }
            Op::ExtendFront(items) => {
                if v1.len() < MAX_LEN {
                    d1.extend_front(items.iter().copied());
                    for &x in items.iter().rev() {
                        v1.push_front(x);
                    }
                }
            }
            Op::ExtendFrontUnsized(items) => {
                if v1.len() < MAX_LEN {
                    let half = items.len() / 2;
                    let (sized, rest) = items.split_at(half);
                    d1.extend_front(sized.iter().copied().chain(rest.iter().copied().filter(|_| true)));
                    for &x in items.iter().rev() {
                        v1.push_front(x);
                    }
                }
            }
            Op::Front => {
                assert_eq!(d1.front(), v1.front());
                assert_eq!(d2.front(), v2.front());
            }
            Op::Get(i) => {
                assert_eq!(d1.get(*i), v1.get(*i));
                assert_eq!(d2.get(*i), v2.get(*i));
                if !v1.is_empty() {
                    let i1 = *i % v1.len();
                    assert_eq!(d1[i1], v1[i1]);
                }
            }
            &Op::GetMut(i, a) => {
                if !v1.is_empty() {
                    let i1 = i % v1.len();
                    d1[i1] = a;
                    v1[i1] = a;
                }
            }
            Op::Indices => {
                let mut indices = d1.indices();
                let mut v1_iter = v1.iter();
                assert_eq!(indices.len(), v1_iter.len());
                while v1_iter.len() > 0 {
                    if fastrand::bool() {
                        assert_eq!(indices.next().map(|i| &d1[i]), v1_iter.next());
                    } else {
                        assert_eq!(indices.next_back().map(|i| &d1[i]), v1_iter.next_back());
                    }
                }
                assert_eq!(indices.next(), None);
                assert_eq!(d1.distance(d1.start_index(), d1.end_index()), v1.len() as isize);
            }
            Op::Iter => {
                let mut d1_iter = d1.iter();
                let mut v1_iter = v1.iter();
                while v1_iter.len() > 0 {
                    if fastrand::bool() {
                        assert_eq!(d1_iter.next(), v1_iter.next());
                    } else {
                        assert_eq!(d1_iter.next_back(), v1_iter.next_back());
                    }
                }

                let mut d2_iter = d2.iter();
                let mut v2_iter = v2.iter();
                while v2_iter.len() > 0 {
                    if fastrand::bool() {
                        assert_eq!(d2_iter.next(), v2_iter.next());
                    } else {
                        assert_eq!(d2_iter.next_back(), v2_iter.next_back());
                    }
                }
            }
            Op::Len => {
                assert_eq!(d1.len(), v1.len());
                assert_eq!(d2.len(), v2.len());
            }
            Op::MakeContiguous => {
                assert_eq!(d1.make_contiguous(), v1.make_contiguous());
            }
            Op::PopBack => {
                assert_eq!(d1.pop_back(), v1.pop_back());
            }
            Op::PopFront => {
                assert_eq!(d1.pop_front(), v1.pop_front());
            }
            Op::PushBack(i) => {
                if v1.len() < MAX_LEN {
                    d1.push_back(*i);
                    v1.push_back(*i);
                }
            }
            Op::PushFront(i) => {
                if v1.len() < MAX_LEN {
                    d1.push_front(*i);
                    v1.push_front(*i);
                }
            }
            &Op::RemoveAll(keep) => {
                d1.remove_all(keep);
                v1.clear();
            }
            &Op::RemoveFirstN(k) => {
                let k = k.min(v1.len());
                d1.remove_first_n(k);
                v1.drain(..k);
            }
            &Op::RemoveLastN(k) => {
                let k = k.min(v1.len());
                d1.remove_last_n(k);
                v1.truncate(v1.len() - k);
            }
            &Op::ReserveCapacity(n) => {
                d1.reserve_capacity(n as usize);
                assert!(d1.capacity() >= n as usize);
            }
            Op::Snapshot => {
                d2 = d1.clone();
                v2 = v1.clone();
            }
            Op::Restore => {
                d1 = d2.clone();
                v1 = v2.clone();
            }
        }
        assert_eq!(d2.len(), v2.len());
    }
    assert!(d1.iter().eq(v1.iter()));
    assert!(d2.iter().eq(v2.iter()));
}
