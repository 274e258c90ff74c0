use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cowdeque::Deque;

fn criterion_benchmarks(c: &mut Criterion) {
    c.bench_function("bench_new", |b| {
        b.iter(|| {
            let ring: Deque<i32> = Deque::new();
            black_box(ring);
        })
    });

    c.bench_function("bench_grow_1025", |b| {
        b.iter(|| {
            let mut deq = Deque::new();
            for i in 0..1025 {
                deq.push_front(i);
            }
            black_box(deq);
        })
    });

    let ring: Deque<_> = (0..1000).collect();
    c.bench_function("bench_iter_1000", |b| {
        b.iter(|| {
            let mut sum = 0;
            for &i in &ring {
                sum += i;
            }
            black_box(sum);
        })
    });

    let mut ring: Deque<_> = (0..1000).collect();
    c.bench_function("bench_mut_iter_1000", |b| {
        b.iter(|| {
            let mut sum = 0;
            for i in &mut ring {
                sum += *i;
            }
            black_box(sum);
        })
    });

    let ring: Deque<_> = (0..1000).collect();
    c.bench_function("bench_indices_1000", |b| {
        b.iter(|| {
            let mut sum = 0;
            for i in ring.indices() {
                sum += ring[i];
            }
            black_box(sum);
        })
    });

    const N: usize = 1000;
    let mut array: [usize; N] = [0; N];
    for (i, slot) in array.iter_mut().enumerate() {
        *slot = i;
    }
    c.bench_function("bench_from_array_1000", |b| {
        b.iter(|| {
            let deq: Deque<_> = array.into();
            black_box(deq);
        })
    });

    let mut ring: Deque<u8> = Deque::with_capacity(1000);
    let input: &[u8] = &[128; 512];
    c.bench_function("bench_extend_bytes", |b| {
        b.iter(|| {
            ring.clear();
            ring.extend(black_box(input));
        })
    });

    let mut ring: Deque<u16> = Deque::with_capacity(1000);
    c.bench_function("bench_extend_chained", |b| {
        b.iter(|| {
            ring.clear();
            ring.extend(black_box((0..256).chain(768..1024)));
        })
    });

    let mut ring: Deque<u16> = Deque::with_capacity(1000);
    c.bench_function("bench_extend_front_in_place", |b| {
        b.iter(|| {
            ring.clear();
            ring.push_back(0);
            ring.extend_front(black_box(1..512));
        })
    });

    let mut ring: Deque<u16> = Deque::with_capacity(1000);
    c.bench_function("bench_extend_front_undersized_hint", |b| {
        b.iter(|| {
            ring.clear();
            ring.push_back(0);
            ring.extend_front(black_box((1..256).chain((256..512).filter(|_| true))));
        })
    });

    let shared: Deque<u64> = (0..1000).collect();
    c.bench_function("bench_clone_then_push_1000", |b| {
        b.iter(|| {
            let mut copy = shared.clone();
            copy.push_back(black_box(0));
            black_box(copy);
        })
    });

    let mut ring: Deque<u64> = (0..1000).collect();
    c.bench_function("bench_remove_first_n", |b| {
        b.iter(|| {
            ring.extend(0..500);
            ring.remove_first_n(black_box(500));
        })
    });
}

criterion_group!(benches, criterion_benchmarks);
criterion_main!(benches);
