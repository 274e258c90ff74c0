// Profiling driver for the bulk paths.

use cowdeque::Deque;

fn main() {
    let mut d = Deque::new();
    for _ in 0..1_000_000 {
        d.clear();
        d.extend(std::hint::black_box((0..256).chain(768..1024)));
        let shared = d.clone();
        d.extend_front(std::hint::black_box(256..512));
        d.remove_first_n(128);
        std::hint::black_box(&shared);
    }
}
